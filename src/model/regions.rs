//! Runnable query regions: maximal runs of non-blank lines, numbered in
//! document order so a single statement block can be run on its own.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Map each 1-based line number to its region id. Blank lines map to 0.
///
/// The first blank line of a run bumps the counter, so content that follows
/// leading blank lines starts at region 2.
pub fn segment<I, S>(lines: I) -> BTreeMap<usize, usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut regions = BTreeMap::new();
    let mut region = 1;
    let mut just_saw_blank = false;

    for (idx, line) in lines.into_iter().enumerate() {
        let number = idx + 1;
        if line.as_ref().trim().is_empty() {
            regions.insert(number, 0);
            if !just_saw_blank {
                region += 1;
                just_saw_blank = true;
            }
        } else {
            regions.insert(number, region);
            just_saw_blank = false;
        }
    }

    regions
}

/// Line numbers making up the region that contains `row`, or `None` when the
/// row is blank or out of range.
pub fn region_at(regions: &BTreeMap<usize, usize>, row: usize) -> Option<RangeInclusive<usize>> {
    let id = *regions.get(&row)?;
    if id == 0 {
        return None;
    }

    let first = regions
        .range(..=row)
        .rev()
        .take_while(|(_, group)| **group == id)
        .last()
        .map(|(n, _)| *n)?;
    let last = regions
        .range(row..)
        .take_while(|(_, group)| **group == id)
        .last()
        .map(|(n, _)| *n)?;

    Some(first..=last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(map: &BTreeMap<usize, usize>) -> Vec<(usize, usize)> {
        map.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn statements_separated_by_blank_runs() {
        let lines = [
            "SELECT 1;",
            "",
            "SELECT 2;",
            "SELECT 3;",
            "",
            "",
            "SELECT 4;",
        ];
        let map = segment(lines);
        assert_eq!(
            ids(&map),
            vec![(1, 1), (2, 0), (3, 2), (4, 2), (5, 0), (6, 0), (7, 3)]
        );
    }

    #[test]
    fn no_blank_lines_is_one_region() {
        let map = segment(["a", "b", "c"]);
        assert!(map.values().all(|id| *id == 1));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn leading_blanks_fire_the_increment() {
        let map = segment(["", "  ", "SELECT 1;"]);
        assert_eq!(ids(&map), vec![(1, 0), (2, 0), (3, 2)]);
    }

    #[test]
    fn whitespace_only_counts_as_blank() {
        let map = segment(["a", " \t ", "b"]);
        assert_eq!(ids(&map), vec![(1, 1), (2, 0), (3, 2)]);
    }

    #[test]
    fn region_at_finds_statement_bounds() {
        let map = segment(["x", "", "a", "b", "c", "", "y"]);
        assert_eq!(region_at(&map, 4), Some(3..=5));
        assert_eq!(region_at(&map, 1), Some(1..=1));
        assert_eq!(region_at(&map, 2), None);
        assert_eq!(region_at(&map, 99), None);
    }
}
