use url::Url;

/// Decides whether `then` is a safe post-logout redirect target.
///
/// Accepts server-relative paths and absolute URLs that stay on the trusted
/// origin. Everything else, including anything that fails to parse, is
/// rejected; the input is never normalized before checking.
pub fn is_safe_redirect(then: &str, trusted: &Url) -> bool {
    if is_server_relative(then) {
        return true;
    }

    matches_trusted_base(then, trusted)
}

/// A server-relative URL starts with exactly one path separator. Two leading
/// separators are protocol-relative and point at another host, and browsers
/// treat a leading `/\` the same way.
fn is_server_relative(then: &str) -> bool {
    then.starts_with('/') && !then.starts_with("//") && !then.starts_with("/\\")
}

/// Validates an absolute candidate the way an authorization server validates
/// a registered redirect URI: scheme, host, and port must match exactly and
/// the trusted base's path must be a prefix of the candidate's path.
fn matches_trusted_base(then: &str, trusted: &Url) -> bool {
    let Ok(candidate) = Url::parse(then) else {
        return false;
    };

    candidate.scheme() == trusted.scheme()
        && candidate.host_str() == trusted.host_str()
        && candidate.port() == trusted.port()
        && candidate.path().starts_with(trusted.path())
}
