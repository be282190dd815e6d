//! Green/grey partitioning for bulk reports.

use greencheck_core::GreenDomain;
use std::collections::HashSet;

/// Requested hosts that do not appear among the known green domains.
///
/// Matching is exact string comparison against [`GreenDomain::url`]; order
/// and duplicates of `requested` are kept.
pub fn grey_only<S: AsRef<str>>(requested: &[S], known_green: &[GreenDomain]) -> Vec<String> {
    let green: HashSet<&str> = known_green.iter().map(|d| d.url.as_str()).collect();

    requested
        .iter()
        .map(AsRef::as_ref)
        .filter(|host| !green.contains(host))
        .map(str::to_owned)
        .collect()
}

/// All green results, in order, followed by a grey placeholder for each grey host.
///
/// Callers keep the two inputs disjoint, typically by passing the output of
/// [`grey_only`] as `grey_hosts`.
pub fn build_green_grey_list<I, S>(grey_hosts: I, green_results: Vec<GreenDomain>) -> Vec<GreenDomain>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut combined = green_results;
    combined.extend(grey_hosts.into_iter().map(GreenDomain::grey_result));
    combined
}
