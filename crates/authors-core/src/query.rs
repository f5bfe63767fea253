//! Query engine
//!
//! Derives the visible author list from the store contents, a free-text
//! query, and a [`SortMode`]. Everything here is pure and recomputes from
//! scratch; [`QueryCache`] is available when the catalog grows large
//! enough for that to matter.

use std::cmp::Ordering;

use crate::models::{Author, SortMode};
use crate::storage::KeyValueStore;
use crate::store::Store;

/// Check whether an author matches an already-lowercased needle
///
/// Name, bio, rendered alias and each tag are checked independently; any
/// one match is enough. An empty needle matches everything.
pub fn matches(author: &Author, needle: &str) -> bool {
    needle.is_empty()
        || author.name.to_lowercase().contains(needle)
        || author.bio.to_lowercase().contains(needle)
        || author.full_alias().to_lowercase().contains(needle)
        || author.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Keep the authors matching `query`, case-insensitively, in input order
pub fn filter<'a, I>(authors: I, query: &str) -> Vec<&'a Author>
where
    I: IntoIterator<Item = &'a Author>,
{
    let needle = query.trim().to_lowercase();
    authors
        .into_iter()
        .filter(|author| matches(author, &needle))
        .collect()
}

/// Order authors by `mode`; equal keys keep their input order
pub fn sort(mut authors: Vec<&Author>, mode: SortMode) -> Vec<&Author> {
    match mode {
        SortMode::Popular => authors.sort_by(|a, b| b.follower_count.cmp(&a.follower_count)),
        SortMode::Az => authors.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortMode::Recent => authors.sort_by(|a, b| b.joined_at.cmp(&a.joined_at)),
    }
    authors
}

/// Filter then sort
pub fn view<'a>(authors: &'a [Author], query: &str, mode: SortMode) -> Vec<&'a Author> {
    sort(filter(authors, query), mode)
}

/// Compare display names the way a reader expects them alphabetized
///
/// Case and common Latin accents are ignored at first ("Lucía" sorts with
/// "Lucia", "amy" with "Amy"); remaining differences are settled by the
/// lowercase form, then by case with lowercase first ("amy" before "Amy").
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| lower_first(a).cmp(lower_first(b)))
}

fn lower_first(s: &str) -> impl Iterator<Item = (bool, char)> + '_ {
    s.chars().map(|c| (c.is_uppercase(), c))
}

fn collation_key(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).map(base_letter).collect()
}

fn base_letter(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ś' | 'š' => 's',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

/// Memoized [`view`] over a store
///
/// The cached result is keyed on the trimmed query, the sort mode and the
/// store's version, so any successful store mutation invalidates it.
#[derive(Debug, Default)]
pub struct QueryCache {
    key: Option<(String, SortMode, u64)>,
    ids: Vec<String>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible authors for `query` and `mode`, reusing the last result when
    /// nothing changed
    pub fn view<'a, S: KeyValueStore>(
        &mut self,
        store: &'a Store<S>,
        query: &str,
        mode: SortMode,
    ) -> Vec<&'a Author> {
        let key = (query.trim().to_lowercase(), mode, store.version());

        if self.key.as_ref() == Some(&key) {
            self.hits += 1;
            return self.ids.iter().filter_map(|id| store.get(id)).collect();
        }

        self.misses += 1;
        let result = view(store.list(), query, mode);
        self.ids = result.iter().map(|a| a.id.clone()).collect();
        self.key = Some(key);
        result
    }

    /// Number of lookups served from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that recomputed the view
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::validate;
    use crate::catalog::Catalog;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids<'a>(authors: &[&'a Author]) -> Vec<&'a str> {
        authors.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let catalog = Catalog::sample();
        let result = filter(catalog.authors(), "");
        assert_eq!(ids(&result), vec!["a1", "a2", "a3", "a4"]);

        let result = filter(catalog.authors(), "   ");
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_filter_by_tag_single_result() {
        let catalog = Catalog::sample();
        for mode in SortMode::ALL {
            let result = view(catalog.authors(), "cyberpunk", mode);
            assert_eq!(ids(&result), vec!["a3"]);
        }
    }

    #[test]
    fn test_filter_fields() {
        let catalog = Catalog::sample();

        // name, case-insensitive
        assert_eq!(ids(&filter(catalog.authors(), "MINA")), vec!["a2"]);
        // bio
        assert_eq!(ids(&filter(catalog.authors(), "coffee")), vec!["a2"]);
        // rendered alias
        assert_eq!(ids(&filter(catalog.authors(), "lucia.animetlik")), vec!["a4"]);
        // shared suffix matches everyone with an alias
        assert_eq!(filter(catalog.authors(), "animetlik.eth").len(), 4);
        // tag substring
        assert_eq!(ids(&filter(catalog.authors(), "slice")), vec!["a2"]);
        // nothing
        assert!(filter(catalog.authors(), "zzz-none").is_empty());
    }

    #[test]
    fn test_filter_matches_placeholder() {
        let authors = vec![Author::new("x", "No Alias", date(2024, 1, 1))];
        assert_eq!(filter(&authors, "—.").len(), 1);
    }

    #[test]
    fn test_sort_popular_and_az() {
        let zed = Author::new("A", "Zed", date(2024, 1, 1)).with_follower_count(100);
        let amy = Author::new("B", "Amy", date(2024, 1, 2)).with_follower_count(50);
        let authors = vec![zed, amy];

        assert_eq!(ids(&view(&authors, "", SortMode::Popular)), vec!["A", "B"]);
        assert_eq!(ids(&view(&authors, "", SortMode::Az)), vec!["B", "A"]);
        assert_eq!(ids(&view(&authors, "", SortMode::Recent)), vec!["B", "A"]);
    }

    #[test]
    fn test_sort_sample_catalog() {
        let catalog = Catalog::sample();
        let authors = catalog.authors();

        assert_eq!(
            ids(&view(authors, "", SortMode::Popular)),
            vec!["a3", "a1", "a2", "a4"]
        );
        assert_eq!(
            ids(&view(authors, "", SortMode::Az)),
            vec!["a1", "a3", "a4", "a2"]
        );
        assert_eq!(
            ids(&view(authors, "", SortMode::Recent)),
            vec!["a4", "a2", "a1", "a3"]
        );
    }

    #[test]
    fn test_sort_ties_keep_input_order() {
        let authors = vec![
            Author::new("1", "Same", date(2024, 1, 1)).with_follower_count(5),
            Author::new("2", "Same", date(2024, 1, 1)).with_follower_count(5),
            Author::new("3", "Same", date(2024, 1, 1)).with_follower_count(5),
        ];
        for mode in SortMode::ALL {
            assert_eq!(ids(&view(&authors, "", mode)), vec!["1", "2", "3"]);
        }
    }

    #[test]
    fn test_compare_names_ignores_case_and_accents() {
        assert_eq!(compare_names("amy", "Bob"), Ordering::Less);
        assert_eq!(compare_names("Lucía", "Lucib"), Ordering::Less);
        assert_eq!(compare_names("Émile", "Eve"), Ordering::Less);
        assert_ne!(compare_names("Lucía", "Lucia"), Ordering::Equal);
        assert_eq!(compare_names("Same", "Same"), Ordering::Equal);
    }

    #[test]
    fn test_compare_names_lowercase_before_uppercase() {
        assert_eq!(compare_names("amy", "Amy"), Ordering::Less);
        assert_eq!(compare_names("Amy", "amy"), Ordering::Greater);
        assert_eq!(compare_names("mcKay", "McKay"), Ordering::Less);
        assert_eq!(compare_names("Amy", "amz"), Ordering::Less);
    }

    #[test]
    fn test_cache_hits_until_store_changes() {
        let mut store = Store::initialize(Catalog::sample(), MemoryStore::new());
        let mut cache = QueryCache::new();

        let first = ids(&cache.view(&store, "akira", SortMode::Popular));
        let again = ids(&cache.view(&store, " AKIRA ", SortMode::Popular));
        assert_eq!(first, vec!["a1"]);
        assert_eq!(again, first);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));

        store.set_alias("a2", validate("akira-fan").unwrap()).unwrap();
        let after = ids(&cache.view(&store, "akira", SortMode::Popular));
        assert_eq!(after, vec!["a1", "a2"]);
        assert_eq!(cache.misses(), 2);

        cache.view(&store, "akira", SortMode::Az);
        assert_eq!(cache.misses(), 3);
    }

    fn arb_author() -> impl Strategy<Value = Author> {
        (
            "[a-z]{1,6}",
            "[A-Za-z ]{1,12}",
            "[a-z ]{0,20}",
            0u64..1000,
            0i64..3000,
            proptest::collection::vec("[a-z]{1,8}", 0..3),
        )
            .prop_map(|(id, name, bio, followers, days, tags)| {
                let joined = date(2020, 1, 1) + chrono::Duration::days(days);
                let mut author = Author::new(id, name, joined)
                    .with_bio(bio)
                    .with_follower_count(followers);
                author.tags = tags;
                author
            })
    }

    proptest! {
        #[test]
        fn prop_filter_is_ordered_subset(
            authors in proptest::collection::vec(arb_author(), 0..20),
            query in "[a-z]{0,3}",
        ) {
            let result = filter(&authors, &query);
            let mut remaining = authors.iter();
            for kept in &result {
                prop_assert!(remaining.any(|a| std::ptr::eq(a, *kept)));
                prop_assert!(matches(kept, &query));
            }
        }

        #[test]
        fn prop_sort_popular_non_increasing(authors in proptest::collection::vec(arb_author(), 0..20)) {
            let sorted = view(&authors, "", SortMode::Popular);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].follower_count >= pair[1].follower_count);
            }
        }

        #[test]
        fn prop_sort_az_non_decreasing(authors in proptest::collection::vec(arb_author(), 0..20)) {
            let sorted = view(&authors, "", SortMode::Az);
            for pair in sorted.windows(2) {
                prop_assert!(compare_names(&pair[0].name, &pair[1].name) != Ordering::Greater);
            }
        }

        #[test]
        fn prop_sort_recent_non_increasing(authors in proptest::collection::vec(arb_author(), 0..20)) {
            let sorted = view(&authors, "", SortMode::Recent);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].joined_at >= pair[1].joined_at);
            }
        }
    }
}
