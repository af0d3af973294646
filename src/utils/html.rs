/// Sanitizes admin-supplied group descriptions with `ammonia`.
///
/// Descriptions may carry light markup (<b>, <p>, links); scripts, frames and
/// event-handler attributes are stripped before the text reaches the store.
pub fn clean_description(input: &str) -> String {
    ammonia::clean(input).trim().to_string()
}
