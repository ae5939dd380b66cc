/// Aggregate root of a persisted collection.
pub trait AggregateRoot {
    type Id;

    fn id(&self) -> Self::Id;

    /// Aggregate index in the system (e.g. "a002")
    fn aggregate_index() -> &'static str;

    /// Collection name (e.g. "product")
    fn collection_name() -> &'static str;

    /// Full name, also used as the table name (e.g. "a002_product")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
