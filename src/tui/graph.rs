use crate::model::{DepRef, Item, Status};

/// One node of the dependency graph view. Ephemeral, rebuilt from the
/// Detail cache on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    pub status: Status,
    pub column: usize,
    pub position: usize,
}

/// Three fixed columns: blockers, the focal item, blocked items.
pub const COLUMN_BLOCKERS: usize = 0;
pub const COLUMN_FOCAL: usize = 1;
pub const COLUMN_BLOCKED: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct GraphState {
    pub nodes: Vec<GraphNode>,
    /// `(column, row)` of the selected node.
    pub cursor: (usize, usize),
}

impl GraphState {
    pub fn build(focal: &Item, depends_on: &[DepRef], blocks: &[DepRef]) -> Self {
        let mut nodes = Vec::with_capacity(depends_on.len() + blocks.len() + 1);
        for (row, dep) in depends_on.iter().enumerate() {
            nodes.push(GraphNode {
                id: dep.id.clone(),
                title: dep.title.clone(),
                status: dep.status,
                column: COLUMN_BLOCKERS,
                position: row,
            });
        }
        nodes.push(GraphNode {
            id: focal.id.clone(),
            title: focal.title.clone(),
            status: focal.status,
            column: COLUMN_FOCAL,
            position: 0,
        });
        for (row, dep) in blocks.iter().enumerate() {
            nodes.push(GraphNode {
                id: dep.id.clone(),
                title: dep.title.clone(),
                status: dep.status,
                column: COLUMN_BLOCKED,
                position: row,
            });
        }
        GraphState {
            nodes,
            cursor: (COLUMN_FOCAL, 0),
        }
    }

    pub fn column_len(&self, column: usize) -> usize {
        self.nodes.iter().filter(|n| n.column == column).count()
    }

    pub fn selected(&self) -> Option<&GraphNode> {
        let (column, row) = self.cursor;
        self.nodes
            .iter()
            .find(|n| n.column == column && n.position == row)
    }

    pub fn move_up(&mut self) {
        if self.cursor.1 > 0 {
            self.cursor.1 -= 1;
        }
    }

    pub fn move_down(&mut self) {
        let (column, row) = self.cursor;
        if row + 1 < self.column_len(column) {
            self.cursor.1 = row + 1;
        }
    }

    /// Horizontal movement clamps the row into the target column and skips
    /// empty columns entirely.
    pub fn move_left(&mut self) {
        match self.cursor.0 {
            COLUMN_FOCAL => self.move_into(&[COLUMN_BLOCKERS]),
            COLUMN_BLOCKED => self.move_into(&[COLUMN_FOCAL, COLUMN_BLOCKERS]),
            _ => {}
        }
    }

    pub fn move_right(&mut self) {
        match self.cursor.0 {
            COLUMN_BLOCKERS => self.move_into(&[COLUMN_FOCAL, COLUMN_BLOCKED]),
            COLUMN_FOCAL => self.move_into(&[COLUMN_BLOCKED]),
            _ => {}
        }
    }

    fn move_into(&mut self, targets: &[usize]) {
        for &target in targets {
            let len = self.column_len(target);
            if len > 0 {
                self.cursor = (target, self.cursor.1.min(len - 1));
                return;
            }
        }
    }
}
