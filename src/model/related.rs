//! Discovery of pull requests that touch the same directories.

use std::collections::HashSet;

use log::debug;

use super::catalog::{Catalog, PullRequest};

/// Deepest directory prefix considered when comparing two pull requests.
pub const MAX_PREFIX_DEPTH: usize = 3;

/// Shallowest shared prefix that counts as a relationship. Sharing only a
/// top-level directory such as `src` is too common to mean anything.
pub const MIN_SHARED_DEPTH: usize = 2;

/// A pull request related to the primary one, with the directories they share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedEntity<'a> {
	/// The related pull request.
	pub entity: &'a PullRequest,
	/// Shared directory paths, in the order the primary first touches them.
	pub shared_directories: Vec<String>,
}

/// Directory prefixes of depth `1..=max_depth` touched by `pr`, in first-seen
/// order. The file name itself never counts as a directory.
pub fn directory_prefixes(pr: &PullRequest, max_depth: usize) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();
	for file in &pr.files {
		let segments: Vec<&str> = file.segments().collect();
		let dirs = segments.len().saturating_sub(1).min(max_depth);
		for depth in 1..=dirs {
			let prefix = segments[..depth].join("/");
			if seen.insert(prefix.clone()) {
				out.push(prefix);
			}
		}
	}
	out
}

fn depth_of(prefix: &str) -> usize {
	prefix.split('/').count()
}

/// Finds pull requests of the same repository sharing directories with `primary`.
///
/// Candidates are taken in catalog order. The primary itself is never related.
pub fn find_related<'a>(primary: &PullRequest, catalog: &'a Catalog) -> Vec<RelatedEntity<'a>> {
	let primary_dirs = directory_prefixes(primary, MAX_PREFIX_DEPTH);
	let mut related = Vec::new();

	for other in catalog.in_repo(&primary.repo) {
		if other.id == primary.id {
			continue;
		}
		let other_dirs: HashSet<String> = directory_prefixes(other, MAX_PREFIX_DEPTH)
			.into_iter()
			.collect();
		let shared: Vec<String> = primary_dirs
			.iter()
			.filter(|d| depth_of(d) >= MIN_SHARED_DEPTH && other_dirs.contains(*d))
			.cloned()
			.collect();
		if !shared.is_empty() {
			related.push(RelatedEntity {
				entity: other,
				shared_directories: shared,
			});
		}
	}

	debug!(
		"pr-graph: #{} has {} related pull requests",
		primary.number,
		related.len()
	);
	related
}
