//! Host page collaborator contracts.

/// Loading-status element on the host page.
///
/// The sink is optional; when the host supplies none, lifecycle failures
/// are still logged but produce no visible text. Text written here is
/// user-facing.
pub trait StatusSink {
    /// Replaces the status text.
    fn set_text(&mut self, text: &str);

    /// Switches the element into its error presentation.
    fn mark_errored(&mut self);

    /// Removes the element from the page. Called once, after successful
    /// construction; the sink is dropped afterwards.
    fn remove(&mut self);
}
