//! Read-only catalog of pull requests.
//!
//! The catalog is loaded once and then only queried: lookup by id, filter by
//! repository, filter by status. Nothing in the crate mutates it.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

/// Numeric pull request identifier, unique within a catalog.
pub type EntityId = u64;

/// One changed file inside a pull request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FileChangeRecord {
	/// Slash-delimited path relative to the repository root.
	pub path: String,
	/// Added lines.
	pub additions: u32,
	/// Deleted lines.
	pub deletions: u32,
}

impl FileChangeRecord {
	/// Record for `path` with the given line counts.
	pub fn new(path: impl Into<String>, additions: u32, deletions: u32) -> Self {
		Self {
			path: path.into(),
			additions,
			deletions,
		}
	}

	/// Non-empty path segments. Leading, trailing and doubled slashes are dropped.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.path.split('/').filter(|s| !s.is_empty())
	}
}

/// Lifecycle state of a pull request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrStatus {
	/// Open and ready for review.
	Open,
	/// Merged into the base branch.
	Merged,
	/// Closed without merging.
	Closed,
	/// Opened as a draft.
	Draft,
}

impl PrStatus {
	/// Badge text.
	pub fn label(self) -> &'static str {
		match self {
			PrStatus::Open => "Open",
			PrStatus::Merged => "Merged",
			PrStatus::Closed => "Closed",
			PrStatus::Draft => "Draft",
		}
	}
}

/// Review outcome shown next to the status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
	/// At least one approval and no blocking review.
	Approved,
	/// A reviewer asked for changes.
	ChangesRequested,
	/// Waiting for a first review.
	Pending,
	/// Commented on without a verdict.
	Reviewed,
}

impl ReviewStatus {
	/// Text shown after the status badge.
	pub fn label(self) -> &'static str {
		match self {
			ReviewStatus::Approved => "Approved",
			ReviewStatus::ChangesRequested => "Changes requested",
			ReviewStatus::Pending => "Review pending",
			ReviewStatus::Reviewed => "Reviewed",
		}
	}
}

/// A repository label attached to a pull request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Label {
	/// Label text.
	pub name: String,
	/// `#rrggbb` chip colour.
	#[serde(default)]
	pub color: Option<String>,
}

/// A pull request and its changed files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
	/// Catalog-wide unique id.
	pub id: EntityId,
	/// Number within the repository.
	pub number: u64,
	/// `owner/name`. Relationship finding only compares pull requests of one repo.
	pub repo: String,
	/// Title line.
	pub title: String,
	/// Login of the author.
	pub author: String,
	/// Head branch name.
	pub branch: String,
	/// Lifecycle state.
	pub status: PrStatus,
	/// Labels in display order.
	#[serde(default)]
	pub labels: Vec<Label>,
	/// Latest review outcome, if reviewed at all.
	#[serde(default)]
	pub review_status: Option<ReviewStatus>,
	/// Number of review comments.
	#[serde(default)]
	pub comments: u32,
	/// Human-readable last update, e.g. `2h ago`.
	#[serde(default)]
	pub updated_at: String,
	/// Short description shown under the title.
	#[serde(default)]
	pub summary: String,
	/// Total added lines.
	pub additions: u32,
	/// Total deleted lines.
	pub deletions: u32,
	/// Changed files.
	pub files: Vec<FileChangeRecord>,
}

impl PullRequest {
	/// Repository name without the owner, used as the label of the tree root.
	pub fn repo_name(&self) -> &str {
		self.repo.rsplit('/').next().unwrap_or(&self.repo)
	}

	/// One-paragraph description shown under the title, `None` when blank.
	pub fn summary_text(&self) -> Option<&str> {
		let text = self.summary.trim();
		(!text.is_empty()).then_some(text)
	}

	/// Pull request page on GitHub.
	pub fn url(&self) -> String {
		format!("https://github.com/{}/pull/{}", self.repo, self.number)
	}
}

/// Status filter tabs of the list view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusFilter {
	/// Every pull request.
	All,
	/// Only [`PrStatus::Open`].
	Open,
	/// Only [`PrStatus::Merged`].
	Merged,
	/// Only [`PrStatus::Draft`].
	Draft,
}

impl StatusFilter {
	/// Tabs in display order.
	pub const TABS: [StatusFilter; 4] = [
		StatusFilter::All,
		StatusFilter::Open,
		StatusFilter::Merged,
		StatusFilter::Draft,
	];

	/// Tab text.
	pub fn label(self) -> &'static str {
		match self {
			StatusFilter::All => "all",
			StatusFilter::Open => "open",
			StatusFilter::Merged => "merged",
			StatusFilter::Draft => "draft",
		}
	}

	/// Whether a pull request with `status` is listed under this tab.
	pub fn matches(self, status: PrStatus) -> bool {
		match self {
			StatusFilter::All => true,
			StatusFilter::Open => status == PrStatus::Open,
			StatusFilter::Merged => status == PrStatus::Merged,
			StatusFilter::Draft => status == PrStatus::Draft,
		}
	}
}

/// Why a catalog could not be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// The text is not a JSON array of pull requests.
	#[error("failed to parse catalog: {0}")]
	Parse(#[from] serde_json::Error),

	/// Two entries share an id.
	#[error("duplicate pull request id {0}")]
	DuplicateId(EntityId),
}

/// Ordered, read-only collection of pull requests.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
	entries: Vec<PullRequest>,
}

impl Catalog {
	/// Builds a catalog, rejecting duplicate ids.
	pub fn new(entries: Vec<PullRequest>) -> Result<Self, CatalogError> {
		let mut seen = HashSet::with_capacity(entries.len());
		for pr in &entries {
			if !seen.insert(pr.id) {
				return Err(CatalogError::DuplicateId(pr.id));
			}
		}
		Ok(Self { entries })
	}

	/// Parses a JSON array of pull requests.
	pub fn from_json(text: &str) -> Result<Self, CatalogError> {
		let entries: Vec<PullRequest> = serde_json::from_str(text)?;
		Self::new(entries)
	}

	/// Pull request with `id`.
	pub fn get(&self, id: EntityId) -> Option<&PullRequest> {
		self.entries.iter().find(|pr| pr.id == id)
	}

	/// Resolves an optional id, degrading unknown ids to `None`.
	pub fn resolve(&self, id: Option<EntityId>) -> Option<&PullRequest> {
		id.and_then(|id| self.get(id))
	}

	/// All pull requests in catalog order.
	pub fn iter(&self) -> impl Iterator<Item = &PullRequest> {
		self.entries.iter()
	}

	/// Pull requests of `repo`, borrowed from the catalog rather than from `repo`.
	pub fn in_repo<'a, 'r>(&'a self, repo: &'r str) -> impl Iterator<Item = &'a PullRequest> + use<'a, 'r> {
		self.entries.iter().filter(move |pr| pr.repo == repo)
	}

	/// Pull requests listed under `filter`, in catalog order.
	pub fn filtered(&self, filter: StatusFilter) -> impl Iterator<Item = &PullRequest> {
		self.entries.iter().filter(move |pr| filter.matches(pr.status))
	}

	/// Tab count for `filter`.
	pub fn count(&self, filter: StatusFilter) -> usize {
		self.filtered(filter).count()
	}

	/// Number of pull requests.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the catalog has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) fn pr(id: EntityId, repo: &str, files: &[(&str, u32, u32)]) -> PullRequest {
		let files: Vec<FileChangeRecord> = files
			.iter()
			.map(|(p, a, d)| FileChangeRecord::new(*p, *a, *d))
			.collect();
		PullRequest {
			id,
			number: id + 100,
			repo: repo.to_string(),
			title: format!("Change {id}"),
			author: "octocat".to_string(),
			branch: format!("feature/{id}"),
			status: PrStatus::Open,
			labels: Vec::new(),
			review_status: None,
			comments: 0,
			updated_at: String::new(),
			summary: String::new(),
			additions: files.iter().map(|f| f.additions).sum(),
			deletions: files.iter().map(|f| f.deletions).sum(),
			files,
		}
	}

	#[test]
	fn parses_camel_case_json() {
		let text = serde_json::json!([{
			"id": 1,
			"number": 42,
			"repo": "acme/api",
			"title": "Add streaming",
			"author": "dev",
			"branch": "feat/stream",
			"status": "draft",
			"reviewStatus": "changes_requested",
			"labels": [{ "name": "feature" }],
			"additions": 10,
			"deletions": 2,
			"files": [{ "path": "src/a.ts", "additions": 10, "deletions": 2 }]
		}])
		.to_string();

		let catalog = Catalog::from_json(&text).unwrap();
		let pr = catalog.get(1).unwrap();
		assert_eq!(pr.status, PrStatus::Draft);
		assert_eq!(pr.review_status, Some(ReviewStatus::ChangesRequested));
		assert_eq!(pr.repo_name(), "api");
		assert_eq!(pr.url(), "https://github.com/acme/api/pull/42");
		assert_eq!(pr.labels[0].name, "feature");
	}

	#[test]
	fn rejects_duplicate_ids() {
		let err = Catalog::new(vec![pr(1, "a/b", &[]), pr(1, "a/b", &[])]).unwrap_err();
		assert!(matches!(err, CatalogError::DuplicateId(1)));
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		assert!(matches!(
			Catalog::from_json("{not json"),
			Err(CatalogError::Parse(_))
		));
	}

	#[test]
	fn unknown_ids_resolve_to_none() {
		let catalog = Catalog::new(vec![pr(1, "a/b", &[])]).unwrap();
		assert!(catalog.resolve(Some(99)).is_none());
		assert!(catalog.resolve(None).is_none());
		assert_eq!(catalog.resolve(Some(1)).map(|p| p.id), Some(1));
	}

	#[test]
	fn status_counts_partition_the_catalog() {
		let mut merged = pr(2, "a/b", &[]);
		merged.status = PrStatus::Merged;
		let mut draft = pr(3, "a/b", &[]);
		draft.status = PrStatus::Draft;
		let mut closed = pr(4, "a/c", &[]);
		closed.status = PrStatus::Closed;
		let catalog = Catalog::new(vec![pr(1, "a/b", &[]), merged, draft, closed]).unwrap();

		assert_eq!(catalog.count(StatusFilter::All), 4);
		assert_eq!(catalog.count(StatusFilter::Open), 1);
		assert_eq!(catalog.count(StatusFilter::Merged), 1);
		assert_eq!(catalog.count(StatusFilter::Draft), 1);
		assert_eq!(catalog.in_repo("a/b").count(), 3);
	}

	#[test]
	fn blank_summaries_are_hidden() {
		let mut p = pr(1, "a/b", &[]);
		assert_eq!(p.summary_text(), None);
		p.summary = "  \n".to_string();
		assert_eq!(p.summary_text(), None);
		p.summary = " Adds retry handling. ".to_string();
		assert_eq!(p.summary_text(), Some("Adds retry handling."));
	}

	#[test]
	fn repo_matches_outlive_the_repo_name() {
		let catalog = Catalog::new(vec![pr(1, "a/b", &[]), pr(2, "a/c", &[]), pr(3, "a/b", &[])]).unwrap();
		let matches: Vec<&PullRequest> = {
			let repo = String::from("a/b");
			catalog.in_repo(&repo).collect()
		};
		assert_eq!(matches.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);
	}

	#[test]
	fn segments_skip_empty_parts() {
		let record = FileChangeRecord::new("/src//api/", 1, 0);
		assert_eq!(record.segments().collect::<Vec<_>>(), vec!["src", "api"]);
	}
}
