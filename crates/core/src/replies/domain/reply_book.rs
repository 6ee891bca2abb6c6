/// Conversational reply lookup keyed by emotion label.
pub trait ReplyBook: Send + Sync {
    /// A reply for `emotion`. Unknown labels get a neutral reply.
    fn reply(&self, emotion: &str) -> String;
}
