use std::{collections::HashMap, fmt};

use crate::cell::Cell;

/// The values of the grouping columns of one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(pub Vec<Cell>);

impl GroupKey {
    #[must_use]
    pub fn from_row(row: &[Cell], indices: &[usize]) -> Self {
        Self(indices.iter().map(|&i| row[i].clone()).collect())
    }

    /// Renders the key as `name=value` pairs for diagnostics.
    #[must_use]
    pub fn describe<S>(&self, names: &[S]) -> String
    where
        S: AsRef<str>,
    {
        names
            .iter()
            .zip(&self.0)
            .map(|(name, cell)| format!("{}={cell}", name.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{cell}")?;
        }
        Ok(())
    }
}

/// Partitions rows by the cells at `indices`.
///
/// Groups are returned in order of first appearance; within a group, row
/// positions keep their input order.
#[must_use]
pub fn group_rows<'a, I>(rows: I, indices: &[usize]) -> Vec<(GroupKey, Vec<usize>)>
where
    I: IntoIterator<Item = &'a [Cell]>,
{
    let mut lookup = HashMap::<GroupKey, usize>::new();
    let mut groups = Vec::<(GroupKey, Vec<usize>)>::new();
    for (i, row) in rows.into_iter().enumerate() {
        let key = GroupKey::from_row(row, indices);
        if let Some(&g) = lookup.get(&key) {
            groups[g].1.push(i);
        } else {
            lookup.insert(key.clone(), groups.len());
            groups.push((key, vec![i]));
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_appearance_order() {
        let rows = [
            vec![Cell::from("b"), Cell::Int(1)],
            vec![Cell::from("a"), Cell::Int(2)],
            vec![Cell::from("b"), Cell::Int(3)],
        ];
        let groups = group_rows(rows.iter().map(Vec::as_slice), &[0]);
        assert_eq!(
            groups,
            [
                (GroupKey(vec![Cell::from("b")]), vec![0, 2]),
                (GroupKey(vec![Cell::from("a")]), vec![1]),
            ]
        );
        assert_eq!(groups[0].0.describe(&["location"]), "location=b");
    }
}
