//! Side panel describing the clicked graph node.

use leptos::prelude::*;

use crate::model::detail::{ChangeSummary, NodeDetail, StatRow, node_detail};
use crate::model::{Catalog, ComposedGraph, PullRequest};

fn stats(additions: u64, deletions: u64) -> impl IntoView {
	view! {
		<span class="mono stat-add">{format!("+{additions}")}</span>
		<span class="mono stat-del">{format!("-{deletions}")}</span>
	}
}

fn info_row(label: &'static str, value: impl IntoView) -> impl IntoView {
	view! {
		<div class="detail-info">
			<span class="pr-muted">{label}</span>
			{value}
		</div>
	}
}

fn net_row(summary: ChangeSummary) -> impl IntoView {
	let class = if summary.net() >= 0 { "mono stat-add" } else { "mono stat-del" };
	info_row("Net change", view! { <span class=class>{summary.net_label()}</span> })
}

fn pr_link(pr: &PullRequest, text: String) -> impl IntoView + use<> {
	view! {
		<a class="mono detail-link" href=pr.url() target="_blank" rel="noopener noreferrer">
			{text}
		</a>
	}
}

fn stat_list(title: &'static str, rows: Vec<StatRow>, suffix: &'static str) -> impl IntoView {
	(!rows.is_empty()).then(|| {
		let items = rows
			.into_iter()
			.map(|r| {
				view! {
					<div class="detail-row">
						<span class="mono">{format!("{}{suffix}", r.name)}</span>
						<div class="detail-row-stats">{stats(r.additions, r.deletions)}</div>
					</div>
				}
			})
			.collect_view();
		view! {
			<h3 class="section-title">{title}</h3>
			<div class="detail-rows">{items}</div>
		}
	})
}

fn header(title: String, subtitle: String, on_close: Callback<()>) -> impl IntoView {
	view! {
		<div class="detail-header">
			<div class="detail-heading">
				<span class="detail-title">{title}</span>
				<span class="mono pr-muted">{subtitle}</span>
			</div>
			<button type="button" class="detail-close" on:click=move |_| on_close.run(())>
				"×"
			</button>
		</div>
	}
}

fn split_bar(summary: ChangeSummary) -> impl IntoView {
	let (add, del) = summary.split_pct();
	view! {
		<div class="detail-summary">
			{stats(summary.additions, summary.deletions)}
			<span class="pr-muted">{format!("{} total", summary.total())}</span>
		</div>
		{(summary.total() > 0).then(|| view! {
			<div class="split-bar">
				<div class="split-add" style=format!("width: {add}%") />
				<div class="split-del" style=format!("width: {del}%") />
			</div>
		})}
	}
}

fn render(detail: NodeDetail<'_>, on_close: Callback<()>) -> AnyView {
	match detail {
		NodeDetail::Hub { pr } => {
			let files = pr
				.files
				.iter()
				.map(|f| StatRow {
					id: f.path.clone(),
					name: f.path.rsplit('/').next().unwrap_or(&f.path).to_string(),
					additions: u64::from(f.additions),
					deletions: u64::from(f.deletions),
				})
				.collect();
			view! {
				<div class="detail-panel">
					{header(pr.title.clone(), format!("{}#{}", pr.repo, pr.number), on_close)}
					<div class="detail-summary">
						{stats(u64::from(pr.additions), u64::from(pr.deletions))}
						<span class="pr-muted">{format!("{} files", pr.files.len())}</span>
					</div>
					<div class="detail-body">
						{stat_list("Changed Files", files, "")}
						{info_row("Author", pr.author.clone())}
						{info_row("Branch", view! { <span class="mono">{pr.branch.clone()}</span> })}
						{info_row("Updated", pr.updated_at.clone())}
						{info_row("PR", pr_link(pr, format!("#{} on GitHub", pr.number)))}
					</div>
				</div>
			}
			.into_any()
		}
		NodeDetail::File {
			name,
			path,
			language,
			summary,
			pr,
		} => view! {
			<div class="detail-panel">
				{header(name, "File".to_string(), on_close)}
				{split_bar(summary)}
				<div class="detail-body">
					<h3 class="section-title">"File Info"</h3>
					{info_row("Path", view! { <span class="mono">{path}</span> })}
					{info_row("Language", view! { <span class="mono">{language}</span> })}
					{net_row(summary)}
					{info_row("PR", pr_link(pr, format!("#{}", pr.number)))}
				</div>
			</div>
		}
		.into_any(),
		NodeDetail::Directory {
			name,
			subdirectories,
			files,
			summary,
			pr,
		} => {
			let file_count = files.len();
			view! {
				<div class="detail-panel">
					{header(name, "Directory".to_string(), on_close)}
					{split_bar(summary)}
					<div class="detail-body">
						{stat_list("Subdirectories", subdirectories, "/")}
						{stat_list("Changed Files", files, "")}
						<h3 class="section-title">"Summary"</h3>
						{info_row("Files changed", view! { <span class="mono">{file_count}</span> })}
						{net_row(summary)}
						{info_row("PR", pr_link(pr, format!("#{}", pr.number)))}
					</div>
				</div>
			}
			.into_any()
		}
	}
}

/// Details for `node_id`, or nothing when the node is unknown.
#[component]
pub fn DetailPanel(
	catalog: StoredValue<Catalog>,
	#[prop(into)] graph: Signal<ComposedGraph>,
	node_id: String,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	move || {
		graph.with(|g| {
			catalog.with_value(|c| node_detail(g, c, &node_id).map(|detail| render(detail, on_close)))
		})
	}
}
