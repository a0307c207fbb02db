/// The time range `[start, end)` a scan invocation covers. Category lead
/// times are applied by the repository when selecting candidates.
#[derive(Debug, Clone)]
pub struct DueWindow {
    pub start: i64,
    pub end: i64,
}
