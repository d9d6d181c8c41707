//! Small text helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Trim and collapse every whitespace run into a single space.
pub fn clean_text(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cap `s` at `max` characters. Longer input keeps `max - 3` characters,
/// right-trimmed, followed by "...".
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    return s.to_string();
  }
  let keep = max.saturating_sub(3);
  let head: String = s.chars().take(keep).collect();
  format!("{}...", head.trim_end())
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole model completions.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}
