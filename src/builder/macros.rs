//! Macros for ergonomic machine construction.

/// Build a `Vec<Transition>` from an `event: from => to` table.
///
/// # Example
///
/// ```
/// use cadence::transitions;
///
/// let table = transitions! {
///     "submit": "Draft" => "Review",
///     "approve": "Review" => "Published",
///     "reject": "Review" => "Draft",
/// };
///
/// assert_eq!(table.len(), 3);
/// assert_eq!(table[1].to, "Published");
/// ```
#[macro_export]
macro_rules! transitions {
    ($($event:literal : $from:literal => $to:literal),* $(,)?) => {
        vec![$($crate::core::Transition::new($event, $from, $to)),*]
    };
}

/// Build a `Vec<State>` of action-free states from their ids.
///
/// # Example
///
/// ```
/// use cadence::states;
///
/// let all = states!["Draft", "Review", "Published"];
/// assert_eq!(all[0].id(), "Draft");
/// ```
#[macro_export]
macro_rules! states {
    ($($id:expr),* $(,)?) => {
        vec![$($crate::core::State::new($id)),*]
    };
}
