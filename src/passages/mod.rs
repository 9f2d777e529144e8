use std::collections::HashMap;

use include_dir::{include_dir, Dir};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

use crate::error::PassageError;

static PASSAGE_DIR: Dir = include_dir!("src/passages");

/// Difficulty bucket for passage selection
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Letters,
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Letters, Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn key(&self) -> &'static str {
        match self {
            Tier::Letters => "letters",
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }

    /// Unknown keys resolve to `Medium`.
    pub fn from_key(key: &str) -> Tier {
        match key.trim().to_lowercase().as_str() {
            "letters" => Tier::Letters,
            "easy" => Tier::Easy,
            "medium" => Tier::Medium,
            "hard" => Tier::Hard,
            other => {
                log::warn!("unknown tier `{other}`, falling back to medium");
                Tier::Medium
            }
        }
    }

    /// Next tier in display order, wrapping around.
    pub fn cycle(&self) -> Tier {
        match self {
            Tier::Letters => Tier::Easy,
            Tier::Easy => Tier::Medium,
            Tier::Medium => Tier::Hard,
            Tier::Hard => Tier::Letters,
        }
    }
}

/// Anything that can hand out a passage for a tier.
pub trait PassageSource {
    fn random(&mut self, tier: Tier) -> String;
}

#[derive(Deserialize, Debug)]
struct CorpusFile {
    tier: Tier,
    passages: Vec<String>,
}

/// Passages grouped by tier, with uniform random selection
#[derive(Debug)]
pub struct PassageBank {
    pools: HashMap<Tier, Vec<String>>,
    rng: StdRng,
}

impl PassageBank {
    pub fn new(pools: HashMap<Tier, Vec<String>>) -> Result<Self, PassageError> {
        if let Some((tier, _)) = pools.iter().find(|(_, pool)| pool.is_empty()) {
            return Err(PassageError::EmptyPool(*tier));
        }
        if !pools.contains_key(&Tier::Medium) {
            return Err(PassageError::MissingFallback);
        }

        Ok(Self {
            pools,
            rng: StdRng::from_entropy(),
        })
    }

    /// Load the corpus compiled into the binary.
    pub fn embedded() -> Result<Self, PassageError> {
        let mut pools = HashMap::new();

        for tier in Tier::ALL {
            let file_name = format!("{}.json", tier.key());
            let Some(file) = PASSAGE_DIR.get_file(&file_name) else {
                log::debug!("no corpus file for tier {tier}");
                continue;
            };

            let contents = file.contents_utf8().ok_or_else(|| PassageError::Corpus {
                file: file_name.clone(),
                reason: "not valid utf-8".to_string(),
            })?;

            let corpus: CorpusFile =
                serde_json::from_str(contents).map_err(|e| PassageError::Corpus {
                    file: file_name.clone(),
                    reason: e.to_string(),
                })?;

            if corpus.tier != tier {
                return Err(PassageError::Corpus {
                    file: file_name,
                    reason: format!("declares tier `{}`", corpus.tier),
                });
            }

            pools.insert(tier, corpus.passages);
        }

        Self::new(pools)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Pool for `tier`, or the medium pool when the tier has none.
    pub fn pool(&self, tier: Tier) -> &[String] {
        self.pools
            .get(&tier)
            .or_else(|| self.pools.get(&Tier::Medium))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn pick_random(&mut self, tier: Tier) -> String {
        let index = match self.pool(tier).len() {
            0 => return String::new(),
            len => self.rng.gen_range(0..len),
        };
        self.pool(tier)[index].clone()
    }
}

impl PassageSource for PassageBank {
    fn random(&mut self, tier: Tier) -> String {
        self.pick_random(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pools(entries: &[(Tier, &[&str])]) -> HashMap<Tier, Vec<String>> {
        entries
            .iter()
            .map(|(tier, texts)| (*tier, texts.iter().map(|t| t.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_embedded_corpus_has_every_tier() {
        let bank = PassageBank::embedded().unwrap();

        for tier in Tier::ALL {
            assert!(!bank.pool(tier).is_empty(), "tier {tier} has no passages");
        }
    }

    #[test]
    fn test_pick_random_comes_from_tier_pool() {
        let mut bank = PassageBank::embedded().unwrap().with_seed(7);

        for _ in 0..20 {
            let passage = bank.pick_random(Tier::Hard);
            assert!(bank.pool(Tier::Hard).contains(&passage));
        }
    }

    #[test]
    fn test_pick_random_reaches_every_passage() {
        let mut bank = PassageBank::new(pools(&[(Tier::Medium, &["أ", "ب", "ت"])]))
            .unwrap()
            .with_seed(3);

        let seen: std::collections::HashSet<String> =
            (0..100).map(|_| bank.pick_random(Tier::Easy)).collect();

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_missing_tier_falls_back_to_medium() {
        let mut bank = PassageBank::new(pools(&[(Tier::Medium, &["وسط"])])).unwrap();

        assert_eq!(bank.pick_random(Tier::Letters), "وسط");
        assert_eq!(bank.random(Tier::Hard), "وسط");
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let result = PassageBank::new(pools(&[(Tier::Medium, &["وسط"]), (Tier::Easy, &[])]));

        assert_matches!(result, Err(PassageError::EmptyPool(Tier::Easy)));
    }

    #[test]
    fn test_missing_medium_is_rejected() {
        let result = PassageBank::new(pools(&[(Tier::Easy, &["باب"])]));

        assert_matches!(result, Err(PassageError::MissingFallback));
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let mut a = PassageBank::embedded().unwrap().with_seed(42);
        let mut b = PassageBank::embedded().unwrap().with_seed(42);

        let first: Vec<String> = (0..10).map(|_| a.pick_random(Tier::Easy)).collect();
        let second: Vec<String> = (0..10).map(|_| b.pick_random(Tier::Easy)).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_tier_from_key() {
        assert_eq!(Tier::from_key("letters"), Tier::Letters);
        assert_eq!(Tier::from_key(" Hard "), Tier::Hard);
        assert_eq!(Tier::from_key("expert"), Tier::Medium);
        assert_eq!(Tier::from_key(""), Tier::Medium);
    }

    #[test]
    fn test_tier_display_matches_key() {
        for tier in Tier::ALL {
            assert_eq!(tier.to_string(), tier.key());
        }
    }

    #[test]
    fn test_tier_cycle_visits_all() {
        let mut tier = Tier::Letters;
        let mut seen = vec![tier];
        for _ in 0..3 {
            tier = tier.cycle();
            seen.push(tier);
        }

        assert_eq!(seen, Tier::ALL.to_vec());
        assert_eq!(tier.cycle(), Tier::Letters);
    }
}
