//! Tuple sets: a list of equal-width tuples stored as a tree so that
//! shared prefixes are held once.
//!
//! ```text
//!           / C3 - D4
//!        B2 - C2 - D3
//!      /         \ D2
//!    A - B1 - C1 - D1
//! ```
//!
//! Each column is a [`TupleSlice`]. A [`TupleValue`] links left to its
//! parent in the previous slice and right to its children in the next one.
//! The last slice holds one value per tuple.

use crate::values::Value;

/// One cell of the tree. Links are indices into neighboring slices.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleValue {
    pub value: Value,
    /// Previous value in the same slice.
    pub down: Option<usize>,
    /// Next value in the same slice.
    pub up: Option<usize>,
    /// Parent in the previous slice.
    pub left: Option<usize>,
    /// Children in the next slice.
    pub right: Vec<usize>,
    /// Position within the slice.
    pub slice_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TupleSlice {
    pub elements: Vec<TupleValue>,
}

impl TupleSlice {
    fn push(&mut self, value: Value, left: Option<usize>) -> usize {
        let index = self.elements.len();
        let down = index.checked_sub(1);
        if let Some(below) = down {
            self.elements[below].up = Some(index);
        }
        self.elements.push(TupleValue {
            value,
            down,
            up: None,
            left,
            right: Vec::new(),
            slice_index: index,
        });
        index
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TupleSet {
    pub slices: Vec<TupleSlice>,
}

impl TupleSet {
    /// Builds the tree from tuples, sharing a prefix with the previous
    /// tuple where the values agree. Returns `None` unless every tuple has
    /// the same, nonzero width.
    pub fn from_tuples<'a>(tuples: impl IntoIterator<Item = &'a [Value]>) -> Option<TupleSet> {
        let mut set = TupleSet::default();
        for tuple in tuples {
            if set.slices.is_empty() {
                if tuple.is_empty() {
                    return None;
                }
                set.slices = vec![TupleSlice::default(); tuple.len()];
            } else if tuple.len() != set.slices.len() {
                return None;
            }
            set.insert(tuple);
        }
        Some(set)
    }

    fn insert(&mut self, tuple: &[Value]) {
        let last = tuple.len() - 1;
        let mut parent: Option<usize> = None;
        let mut sharing = true;

        for (column, value) in tuple.iter().enumerate() {
            let slice = &self.slices[column];
            // The candidate to share is the most recent value under the
            // same parent. The last column is never shared.
            let candidate = match parent {
                None => slice.elements.len().checked_sub(1),
                Some(p) => self.slices[column - 1].elements[p].right.last().copied(),
            };
            let shared = candidate.filter(|&c| {
                sharing && column < last && slice.elements[c].value.equals(value)
            });

            let index = match shared {
                Some(index) => index,
                None => {
                    sharing = false;
                    let index = self.slices[column].push(value.clone(), parent);
                    if let Some(p) = parent {
                        self.slices[column - 1].elements[p].right.push(index);
                    }
                    index
                }
            };
            parent = Some(index);
        }
    }

    /// Number of tuples held.
    pub fn len(&self) -> usize {
        self.slices.last().map_or(0, |s| s.elements.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders one tuple per line. A value shared with the line above is
    /// blanked out, along with everything to its left:
    ///
    /// ```text
    /// {
    ///    (A, B1, C1),
    ///    (   B2, C2)
    /// }
    /// ```
    pub fn render(&self, show: impl Fn(&Value) -> String) -> String {
        if self.is_empty() {
            return "{\n}".to_string();
        }

        let text: Vec<Vec<String>> = self
            .slices
            .iter()
            .map(|slice| slice.elements.iter().map(|e| show(&e.value)).collect())
            .collect();
        let widths: Vec<usize> = text
            .iter()
            .map(|column| column.iter().map(|s| s.chars().count()).max().unwrap_or(0))
            .collect();

        let columns = self.slices.len();
        let mut last_seen: Vec<Option<usize>> = vec![None; columns];
        let mut rows = Vec::with_capacity(self.len());

        for leaf in 0..self.len() {
            // Walk from the leaf back to the root.
            let mut cells: Vec<Option<usize>> = vec![None; columns];
            let mut blanking = false;
            let mut current = Some(leaf);
            for column in (0..columns).rev() {
                let Some(index) = current else { break };
                if last_seen[column] == Some(index) {
                    blanking = true;
                } else {
                    last_seen[column] = Some(index);
                }
                cells[column] = (!blanking).then_some(index);
                current = self.slices[column].elements[index].left;
            }

            let mut row = String::from("(");
            for (column, cell) in cells.iter().enumerate() {
                let width = widths[column];
                match cell {
                    Some(index) => row.push_str(&format!("{:>width$}", text[column][*index])),
                    None => row.push_str(&" ".repeat(width)),
                }
                if column + 1 < columns {
                    row.push_str(if cell.is_some() { ", " } else { "  " });
                }
            }
            row.push(')');
            rows.push(row);
        }

        format!("{{\n   {}\n}}", rows.join(",\n   "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn tuples(rows: &[&[i64]]) -> Vec<Vec<Value>> {
        rows.iter()
            .map(|row| row.iter().map(|i| Value::Int(*i)).collect())
            .collect()
    }

    fn build(rows: &[&[i64]]) -> TupleSet {
        let rows = tuples(rows);
        TupleSet::from_tuples(rows.iter().map(Vec::as_slice)).unwrap()
    }

    #[test]
    fn test_shared_prefixes() {
        let set = build(&[&[1, 2, 3], &[1, 2, 4], &[1, 5, 6]]);
        let widths: Vec<usize> = set.slices.iter().map(|s| s.elements.len()).collect();
        assert_eq!(widths, vec![1, 2, 3]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.slices[0].elements[0].right, vec![0, 1]);
        assert_eq!(set.slices[1].elements[0].right, vec![0, 1]);
        assert_eq!(set.slices[2].elements[2].left, Some(1));
        assert_eq!(set.slices[2].elements[1].down, Some(0));
        assert_eq!(set.slices[2].elements[1].up, Some(2));
    }

    #[test]
    fn test_divergence_stops_sharing() {
        // Equal values after a divergence are not shared.
        let set = build(&[&[1, 2, 3], &[4, 2, 3]]);
        let widths: Vec<usize> = set.slices.iter().map(|s| s.elements.len()).collect();
        assert_eq!(widths, vec![2, 2, 2]);
    }

    #[test]
    fn test_render_blanks_shared_values() {
        let set = build(&[&[1, 2, 3], &[1, 2, 4], &[1, 5, 6], &[10, 5, 6]]);
        assert_eq!(
            set.render(|v| v.to_string()),
            indoc! {"
                {
                   ( 1, 2, 3),
                   (       4),
                   (    5, 6),
                   (10, 5, 6)
                }"}
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(TupleSet::default().render(|v| v.to_string()), "{\n}");
    }

    #[test]
    fn test_mixed_widths_rejected() {
        let rows = tuples(&[&[1, 2], &[1]]);
        assert_eq!(TupleSet::from_tuples(rows.iter().map(Vec::as_slice)), None);
    }
}
