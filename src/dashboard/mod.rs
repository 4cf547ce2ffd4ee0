//! Dashboard summaries: totals, category breakdowns and trailing
//! period-over-period comparisons.

mod endpoints;
mod period;
mod summary;

pub use endpoints::{
    CustomRange, OptionalRange, Totals, get_category_summary_endpoint,
    get_custom_summary_endpoint, get_dashboard_summary_endpoint, get_totals_endpoint,
};
pub use period::{PeriodKind, PeriodRange, trailing_periods};
pub use summary::{
    CategorySummary, DashboardSummary, PeriodPoint, category_summary, custom_summary,
    dashboard_summary, period_comparison,
};
