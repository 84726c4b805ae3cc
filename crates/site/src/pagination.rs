//! Previous/next links between routed pages.

use serde::Serialize;

use crate::routes::FlatPageEntry;

/// Neighbours of a page in navigation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Adjacent<'a> {
    /// The page before, if any.
    pub previous: Option<&'a FlatPageEntry>,
    /// The page after, if any.
    pub next: Option<&'a FlatPageEntry>,
}

/// Finds the neighbours of `canonical_path` in `pages`.
///
/// The first page has no previous and the last has no next. A path that is
/// not routed has neither; the list never wraps around.
pub fn adjacent<'a>(canonical_path: &str, pages: &'a [FlatPageEntry]) -> Adjacent<'a> {
    let Some(index) = pages
        .iter()
        .position(|page| page.canonical_path == canonical_path)
    else {
        return Adjacent::default();
    };

    Adjacent {
        previous: index.checked_sub(1).and_then(|i| pages.get(i)),
        next: pages.get(index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteTable;

    fn titles(adjacent: Adjacent<'_>) -> (Option<&str>, Option<&str>) {
        (
            adjacent.previous.map(|p| p.title.as_str()),
            adjacent.next.map(|p| p.title.as_str()),
        )
    }

    #[test]
    fn ends_have_one_neighbour() {
        let table = RouteTable::zyflo();
        let pages = table.pages();
        assert_eq!(
            titles(adjacent("getting-started/introduction", pages)),
            (None, Some("Installation"))
        );
        assert_eq!(
            titles(adjacent("components/alert", pages)),
            (Some("Drawer"), None)
        );
    }

    #[test]
    fn crosses_section_boundaries() {
        let table = RouteTable::zyflo();
        assert_eq!(
            titles(adjacent("components/navbar", table.pages())),
            (Some("CLI"), Some("Drawer"))
        );
    }

    #[test]
    fn unknown_path_has_no_neighbours() {
        let table = RouteTable::zyflo();
        assert_eq!(adjacent("components/tooltip", table.pages()), Adjacent::default());
        assert_eq!(adjacent("", table.pages()), Adjacent::default());
        assert_eq!(adjacent("components/alert", &[]), Adjacent::default());
    }
}
