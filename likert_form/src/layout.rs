/*!
Placement of the selection controls of a form.

The questions are laid out in two columns: even indices on the left, odd indices on the
right. The vertical cursor advances by one row each time an item is placed in the right
column. A lone trailing left item still takes a full row. Rows are expressed in row units,
the renderer decides how tall a row is.
*/

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Column {
    Left,
    Right,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Placement {
    pub question: usize,
    pub column: Column,
    pub row: u16,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GridLayout {
    pub placements: Vec<Placement>,
    /// Number of rows used by the grid. The free-text area starts right after.
    pub rows: u16,
}

pub fn grid_layout(num_questions: usize) -> GridLayout {
    let mut placements: Vec<Placement> = Vec::with_capacity(num_questions);
    let mut cursor: u16 = 0;
    for question in 0..num_questions {
        if question % 2 == 0 {
            placements.push(Placement {
                question,
                column: Column::Left,
                row: cursor,
            });
        } else {
            placements.push(Placement {
                question,
                column: Column::Right,
                row: cursor,
            });
            cursor = cursor.saturating_add(1);
        }
    }
    let rows = if num_questions % 2 == 1 {
        cursor.saturating_add(1)
    } else {
        cursor
    };
    GridLayout { placements, rows }
}
