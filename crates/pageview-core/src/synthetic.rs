//! Synthetic page-view data for environments without live analytics traffic.

use rand::Rng;

use crate::report::{FlatRecord, DIM_PAGE_PATH, METRIC_ACTIVE_USERS, METRIC_SCREEN_PAGE_VIEWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePattern {
    pub path: &'static str,
    pub view_min: i64,
    pub view_max: i64,
    pub user_min: i64,
    pub user_max: i64,
}

/// Fixed page table. Every pair satisfies `min <= max`.
pub const PAGE_PATTERNS: [PagePattern; 6] = [
    PagePattern {
        path: "/",
        view_min: 500,
        view_max: 1500,
        user_min: 200,
        user_max: 600,
    },
    PagePattern {
        path: "/about",
        view_min: 100,
        view_max: 300,
        user_min: 50,
        user_max: 150,
    },
    PagePattern {
        path: "/blog",
        view_min: 200,
        view_max: 800,
        user_min: 100,
        user_max: 400,
    },
    PagePattern {
        path: "/products",
        view_min: 300,
        view_max: 900,
        user_min: 150,
        user_max: 450,
    },
    PagePattern {
        path: "/pricing",
        view_min: 150,
        view_max: 500,
        user_min: 80,
        user_max: 250,
    },
    PagePattern {
        path: "/contact",
        view_min: 50,
        view_max: 150,
        user_min: 30,
        user_max: 100,
    },
];

/// One record per entry of [`PAGE_PATTERNS`], in table order.
pub fn generate_dummy_page_views() -> Vec<FlatRecord> {
    generate_dummy_page_views_with(&mut rand::thread_rng())
}

pub fn generate_dummy_page_views_with<R: Rng + ?Sized>(rng: &mut R) -> Vec<FlatRecord> {
    PAGE_PATTERNS
        .iter()
        .map(|pattern| {
            let views = rng.gen_range(pattern.view_min..=pattern.view_max);
            let users = rng.gen_range(pattern.user_min..=pattern.user_max);
            FlatRecord::from([
                (DIM_PAGE_PATH.to_string(), pattern.path.to_string()),
                (METRIC_SCREEN_PAGE_VIEWS.to_string(), views.to_string()),
                (METRIC_ACTIVE_USERS.to_string(), users.to_string()),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn pattern_bounds_are_ordered() {
        for p in PAGE_PATTERNS {
            assert!(p.view_min <= p.view_max, "{}", p.path);
            assert!(p.user_min <= p.user_max, "{}", p.path);
        }
    }

    #[test]
    fn always_six_records_in_table_order() {
        for _ in 0..20 {
            let records = generate_dummy_page_views();
            assert_eq!(records.len(), 6);
            let paths: Vec<&str> = records.iter().map(|r| r["pagePath"].as_str()).collect();
            let expected: Vec<&str> = PAGE_PATTERNS.iter().map(|p| p.path).collect();
            assert_eq!(paths, expected);
        }
    }

    #[test]
    fn values_stay_within_pattern_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let records = generate_dummy_page_views_with(&mut rng);
            for (record, pattern) in records.iter().zip(PAGE_PATTERNS.iter()) {
                let views: i64 = record["screenPageViews"].parse().expect("views");
                let users: i64 = record["activeUsers"].parse().expect("users");
                assert!((pattern.view_min..=pattern.view_max).contains(&views));
                assert!((pattern.user_min..=pattern.user_max).contains(&users));
            }
        }
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let a = generate_dummy_page_views_with(&mut StdRng::seed_from_u64(42));
        let b = generate_dummy_page_views_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
