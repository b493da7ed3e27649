//! Plot selection and id resolution.
//!
//! Ids are matched by exact string comparison against the registered plots,
//! in registration order. Ids are not required to be unique, so one requested
//! id may resolve to several plots; `Resolution` keeps the per-id multiplicity
//! so callers can tell a clean match from a fan-out or a miss.

use crate::spec::PlotSpec;

/// Which plots a setting applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Target {
    /// Every registered plot.
    #[default]
    All,
    /// Plots whose id equals one of these.
    Ids(Vec<String>),
}

impl Target {
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ids(ids.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Self::Ids(vec![id.to_string()])
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Self::Ids(vec![id])
    }
}

impl From<Vec<String>> for Target {
    fn from(ids: Vec<String>) -> Self {
        Self::Ids(ids)
    }
}

impl From<Vec<&str>> for Target {
    fn from(ids: Vec<&str>) -> Self {
        Self::ids(ids)
    }
}

impl<const N: usize> From<[&str; N]> for Target {
    fn from(ids: [&str; N]) -> Self {
        Self::ids(ids)
    }
}

impl<T: Into<Target>> From<Option<T>> for Target {
    fn from(ids: Option<T>) -> Self {
        ids.map(Into::into).unwrap_or_default()
    }
}

/// Outcome of resolving a `Target` against the registered plots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    indices: Vec<usize>,
    /// (requested id, plot indices it matched). Empty for `Target::All`.
    matches: Vec<(String, Vec<usize>)>,
}

impl Resolution {
    /// Plot indices to apply a setting to, in request order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Nothing matched; the setting was not applied to any plot.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// How many plots `id` matched (0 if it was not requested).
    pub fn multiplicity(&self, id: &str) -> usize {
        self.matches
            .iter()
            .find(|(req, _)| req == id)
            .map_or(0, |(_, hits)| hits.len())
    }

    /// Requested ids that matched no plot.
    pub fn unmatched(&self) -> Vec<&str> {
        self.matches
            .iter()
            .filter(|(_, hits)| hits.is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Requested ids that matched more than one plot.
    pub fn duplicates(&self) -> Vec<&str> {
        self.matches
            .iter()
            .filter(|(_, hits)| hits.len() > 1)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// Resolve `target` against `plots`.
///
/// A requested id repeated in the list is only counted once.
pub fn resolve(plots: &[PlotSpec], target: &Target) -> Resolution {
    let ids = match target {
        Target::All => {
            return Resolution {
                indices: (0..plots.len()).collect(),
                matches: Vec::new(),
            };
        }
        Target::Ids(ids) => ids,
    };

    let mut resolution = Resolution::default();
    for id in ids {
        // A repeated request adds no indices: `["a", "a"]` targets `a` once.
        if resolution.matches.iter().any(|(req, _)| req == id) {
            continue;
        }
        let hits: Vec<usize> = plots
            .iter()
            .enumerate()
            .filter(|(_, p)| p.id == *id)
            .map(|(i, _)| i)
            .collect();
        resolution.indices.extend(&hits);
        resolution.matches.push((id.clone(), hits));
    }

    if !resolution.unmatched().is_empty() {
        tracing::warn!(ids = ?resolution.unmatched(), "plot ids matched no registered plot");
    }
    if !resolution.duplicates().is_empty() {
        tracing::warn!(ids = ?resolution.duplicates(), "plot ids matched more than one plot");
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plots(ids: &[&str]) -> Vec<PlotSpec> {
        ids.iter()
            .map(|id| PlotSpec::new("data.csv", *id))
            .collect()
    }

    #[test]
    fn all_resolves_in_registration_order() {
        let r = resolve(&plots(&["a", "b", "c"]), &Target::All);
        assert_eq!(r.indices(), &[0, 1, 2]);
        assert!(r.unmatched().is_empty());
    }

    #[test]
    fn ids_resolve_in_request_order() {
        let r = resolve(&plots(&["a", "b", "c"]), &Target::from(["c", "a"]));
        assert_eq!(r.indices(), &[2, 0]);
        assert_eq!(r.multiplicity("c"), 1);
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let r = resolve(&plots(&["a"]), &Target::from(vec!["a", "zz"]));
        assert_eq!(r.indices(), &[0]);
        assert_eq!(r.unmatched(), vec!["zz"]);
    }

    #[test]
    fn zero_matches_is_empty_not_an_error() {
        let r = resolve(&plots(&["a"]), &Target::from("nonexistent"));
        assert!(r.is_empty());
        assert_eq!(r.multiplicity("nonexistent"), 0);
    }

    #[test]
    fn duplicate_ids_fan_out_and_are_reported() {
        let r = resolve(&plots(&["a", "b", "a"]), &Target::from("a"));
        assert_eq!(r.indices(), &[0, 2]);
        assert_eq!(r.multiplicity("a"), 2);
        assert_eq!(r.duplicates(), vec!["a"]);
    }

    #[test]
    fn repeated_request_is_counted_once() {
        let r = resolve(&plots(&["a", "b"]), &Target::from(["b", "b"]));
        assert_eq!(r.indices(), &[1]);
        assert_eq!(r.len(), 1);
        assert_eq!(r.multiplicity("b"), 1);
    }

    #[test]
    fn none_means_all() {
        let t: Target = Option::<&str>::None.into();
        assert_eq!(t, Target::All);
    }
}
