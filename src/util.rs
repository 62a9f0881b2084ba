/// Shortens a node title for inline labels without chopping a multi-byte
/// character in half.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_owned();
    }

    let kept = title
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    format!("{}…", kept.trim_end())
}

pub fn format_count_pair(shown: usize, total: usize) -> String {
    if shown == total {
        format!("{total}")
    } else {
        format!("{shown}/{total}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_title_keeps_short_titles() {
        assert_eq!(truncate_title("ship it", 12), "ship it");
    }

    #[test]
    fn truncate_title_trims_long_titles() {
        let out = truncate_title("a very long decision title indeed", 10);
        assert!(out.chars().count() <= 10);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn format_count_pair_collapses_equal_counts() {
        assert_eq!(format_count_pair(4, 4), "4");
        assert_eq!(format_count_pair(2, 4), "2/4");
    }
}
