use std::fmt;

use shared::{domain::Combination, protocol::FilterMatches};

pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub preview_limit: usize,
    pub show_stats: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            show_stats: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboStats {
    pub sum: i64,
    pub even: usize,
    pub odd: usize,
    pub low: usize,
    pub high: usize,
}

impl ComboStats {
    /// Low numbers are `1..=pool_size / 2`, high numbers the rest of the pool.
    pub fn of(combo: &Combination, pool_size: i64) -> Self {
        let even = combo.even_count();
        let midpoint = pool_size / 2;
        let low = combo
            .numbers()
            .iter()
            .filter(|n| (1..=midpoint).contains(*n))
            .count();
        let high = combo
            .numbers()
            .iter()
            .filter(|n| **n > midpoint && **n <= pool_size)
            .count();
        Self {
            sum: combo.sum(),
            even,
            odd: combo.len() - even,
            low,
            high,
        }
    }
}

impl fmt::Display for ComboStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sum: {} | Even: {}, Odd: {} | Low: {}, High: {}",
            self.sum, self.even, self.odd, self.low, self.high
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub numbers: String,
    pub stats: Option<ComboStats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsBody {
    NoResults,
    Found {
        items: Vec<RenderedItem>,
        /// `total` minus the preview limit, not minus the items received.
        remaining: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResults {
    pub total: u64,
    pub body: ResultsBody,
}

impl RenderedResults {
    pub fn items(&self) -> &[RenderedItem] {
        match &self.body {
            ResultsBody::NoResults => &[],
            ResultsBody::Found { items, .. } => items,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match &self.body {
            ResultsBody::NoResults => {
                vec!["No combinations found matching the criteria.".to_string()]
            }
            ResultsBody::Found { items, remaining } => {
                let mut lines = Vec::with_capacity(items.len() + 2);
                lines.push(format!("Found {} combinations", self.total));
                for item in items {
                    lines.push(item.numbers.clone());
                    if let Some(stats) = &item.stats {
                        lines.push(format!("  {stats}"));
                    }
                }
                if *remaining > 0 {
                    lines.push(format!("... and {remaining} more combinations"));
                }
                lines
            }
        }
    }
}

impl fmt::Display for RenderedResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

pub fn render_results(
    matches: &FilterMatches,
    pool_size: i64,
    options: RenderOptions,
) -> RenderedResults {
    if matches.total == 0 {
        return RenderedResults {
            total: 0,
            body: ResultsBody::NoResults,
        };
    }

    let items = matches
        .combinations
        .iter()
        .take(options.preview_limit)
        .map(|combo| RenderedItem {
            numbers: combo.to_string(),
            stats: options.show_stats.then(|| ComboStats::of(combo, pool_size)),
        })
        .collect();
    let limit = options.preview_limit as u64;
    let remaining = matches.total.saturating_sub(limit);

    RenderedResults {
        total: matches.total,
        body: ResultsBody::Found { items, remaining },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(count: i64, total: u64) -> FilterMatches {
        FilterMatches {
            combinations: (0..count)
                .map(|i| Combination(vec![i + 1, i + 2, i + 3]))
                .collect(),
            total,
        }
    }

    #[test]
    fn zero_total_renders_notice_without_items() {
        let rendered = render_results(&matches(0, 0), 11, RenderOptions::default());
        assert_eq!(rendered.body, ResultsBody::NoResults);
        assert!(rendered.items().is_empty());
        assert_eq!(
            rendered.to_string(),
            "No combinations found matching the criteria."
        );
    }

    #[test]
    fn fifteen_matches_show_ten_and_summarize_five() {
        let rendered = render_results(&matches(15, 15), 49, RenderOptions::default());
        assert_eq!(rendered.items().len(), 10);
        let lines = rendered.lines();
        assert_eq!(lines.first().map(String::as_str), Some("Found 15 combinations"));
        assert_eq!(lines[1], "1, 2, 3");
        assert_eq!(
            lines.last().map(String::as_str),
            Some("... and 5 more combinations")
        );
    }

    #[test]
    fn remaining_counts_from_total_when_server_truncates() {
        let rendered = render_results(&matches(3, 120), 49, RenderOptions::default());
        assert_eq!(rendered.items().len(), 3);
        assert!(matches!(
            rendered.body,
            ResultsBody::Found { remaining: 110, .. }
        ));
    }

    #[test]
    fn exactly_limit_has_no_summary_line() {
        let rendered = render_results(&matches(10, 10), 49, RenderOptions::default());
        assert_eq!(rendered.lines().len(), 11);
        assert!(!rendered.to_string().contains("more combinations"));
    }

    #[test]
    fn stats_follow_each_combination_when_enabled() {
        let found = FilterMatches {
            combinations: vec![Combination(vec![1, 2, 4, 7, 10, 11])],
            total: 1,
        };
        let options = RenderOptions {
            show_stats: true,
            ..RenderOptions::default()
        };
        let rendered = render_results(&found, 11, options);
        assert_eq!(
            rendered.lines(),
            vec![
                "Found 1 combinations".to_string(),
                "1, 2, 4, 7, 10, 11".to_string(),
                "  Sum: 35 | Even: 3, Odd: 3 | Low: 3, High: 3".to_string(),
            ]
        );
    }

    #[test]
    fn custom_preview_limit_is_honored() {
        let options = RenderOptions {
            preview_limit: 2,
            ..RenderOptions::default()
        };
        let rendered = render_results(&matches(5, 5), 49, options);
        assert_eq!(rendered.items().len(), 2);
        assert!(matches!(
            rendered.body,
            ResultsBody::Found { remaining: 3, .. }
        ));
    }
}
