//! Column formatting for index listings.

/// Pad `input` with spaces to `width` characters, or cut it to `width` characters and
/// append `…` when it is longer.
pub fn fixed_width(input: &str, width: usize) -> String {
  let count = input.chars().count();
  if count <= width {
    let mut padded = String::with_capacity(input.len() + (width - count));
    padded.push_str(input);
    padded.extend(std::iter::repeat_n(' ', width - count));
    return padded;
  }

  let mut cut: String = input.chars().take(width).collect();
  cut.push('\u{2026}');
  cut
}

#[cfg(test)]
mod tests {
  use super::fixed_width;

  #[test]
  fn pads_short_text() {
    assert_eq!(fixed_width("icon", 6), "icon  ");
    assert_eq!(fixed_width("", 2), "  ");
  }

  #[test]
  fn keeps_exact_width_text() {
    assert_eq!(fixed_width("sprite", 6), "sprite");
  }

  #[test]
  fn truncates_long_text_with_ellipsis() {
    assert_eq!(fixed_width("HeroAvatar_2470", 4), "Hero\u{2026}");
    assert_eq!(fixed_width("ÄÖÜäöü", 3), "ÄÖÜ\u{2026}");
  }
}
