//! noharm-ranker: Filtering, grouping, ranking and normalization over
//! benchmark rows. Every function here is pure: it takes its full input and
//! returns a new value.

pub mod filter;
pub mod format;
pub mod group;
pub mod normalise;
pub mod ranking;
pub mod stats;
pub mod summary;
pub mod view;

pub use filter::{filter_rows, CaseSubset, FilterState};
pub use format::{format_metric_value, format_with_ci, FormatOptions};
pub use group::group_rows_by_combination;
pub use normalise::{normalize_for_radar, radar_points, RadarPoint};
pub use ranking::{pick_rows_for_metric, select_for_chart, select_top_bottom, sort_rows_for_metric, RankedRow, TopBottom};
pub use summary::{dataset_summary, DatasetSummary};
pub use stats::pearson_correlation;
pub use view::{
    default_filter_state, derive_team_groups, resolve_color, scatter_points, search_suggestions,
    select_single_severity, toggle_team_condition, toggle_with_minimum, trials_range, TeamGroups,
    TrialsRange,
};
