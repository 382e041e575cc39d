//! Ranking profiles selected through configuration: built-in presets and a custom
//! signal table loaded from TOML.

use news_summarizer::config::SummarizerConfig;
use news_summarizer::rank::{ADVANCED_CAP, LEGACY_CAP};
use news_summarizer::{Article, ProfileName, RankerProfile, SentenceRanker, Summarizer};

const BODY: &str = "The state cabinet met on Tuesday to discuss the monsoon budget. \
    Officials reviewed spending on roads, drains and relief camps across several districts. \
    According to officials, research shows that early drainage work cut flood damage sharply. \
    \"We cannot wait for the rains,\" the minister told reporters after the meeting. \
    Opposition leaders asked for an audit of last year's relief spending. \
    The allocation rose 18% to $1.2 billion compared with the previous year. \
    Analysts said the plan depends on contractors finishing work before June. \
    Experts say most districts still lack pumping stations. \
    Residents in low-lying areas welcomed the decision. \
    The cabinet will meet again next month to review progress.";

const TITLE: &str = "Cabinet approves monsoon budget";

fn scores(profile: RankerProfile) -> Vec<f64> {
    Summarizer::default()
        .with_ranker(SentenceRanker::new(profile))
        .score(TITLE, BODY)
        .expect("scores")
        .into_iter()
        .map(|r| r.score)
        .collect()
}

#[test]
fn presets_respect_their_caps() {
    let advanced = scores(RankerProfile::advanced());
    let legacy = scores(RankerProfile::legacy());
    assert_eq!(advanced.len(), 10);
    assert_eq!(legacy.len(), 10);
    assert!(advanced.iter().all(|s| (0.0..=ADVANCED_CAP).contains(s)));
    assert!(legacy.iter().all(|s| (0.0..=LEGACY_CAP).contains(s)));
}

#[test]
fn legacy_profile_rewards_cue_phrases_and_conclusions() {
    let reports = Summarizer::default()
        .with_ranker(SentenceRanker::new(ProfileName::Legacy.profile()))
        .score(TITLE, BODY)
        .expect("scores");

    // "According to officials, research shows ..." carries two cue phrases.
    assert_eq!(reports[2].signals.cue_phrases, 2.0);
    // Quotation is worth 2 under legacy weights.
    assert_eq!(reports[3].signals.quotation, 2.0);
    // Sentences past 80% of the article get the conclusion bonus.
    assert_eq!(reports[9].signals.position, 1.0);
    // No key-phrase signal in the legacy table.
    assert!(reports.iter().all(|r| r.signals.key_phrases == 0.0));
}

#[test]
fn config_selects_profile() {
    let cfg = SummarizerConfig::from_toml_str("[ranking]\nprofile = \"legacy\"").unwrap();
    let via_config = Summarizer::new(cfg).score(TITLE, BODY).unwrap();
    let direct = scores(RankerProfile::legacy());
    let from_config: Vec<f64> = via_config.iter().map(|r| r.score).collect();
    assert_eq!(from_config, direct);
}

#[test]
fn custom_table_overrides_preset() {
    let cfg = SummarizerConfig::from_toml_str(
        r#"
        [ranking]
        profile = "legacy"

        [ranking.custom]
        name = "title-only"
        cap = 2.0
        position = { rule = "banded", first = 0.0, head_fraction = 0.0, head = 0.0, body_fraction = 0.0, body = 0.0 }
        title = { rule = "coverage", max = 2.0 }
        "#,
    )
    .expect("custom profile");
    assert_eq!(cfg.ranking.resolve().name, "title-only");

    let reports = Summarizer::new(cfg).score(TITLE, BODY).unwrap();
    for r in &reports {
        assert!(r.score <= 2.0);
        assert_eq!(r.score, r.signals.title.min(2.0));
    }
    // Opening sentence covers three of the four title words.
    assert_eq!(reports[0].score, 1.5);
    assert_eq!(reports[1].score, 0.0);
}

#[test]
fn invalid_custom_table_is_rejected() {
    let err = SummarizerConfig::from_toml_str(
        r#"
        [ranking.custom]
        name = "negative"
        cap = -1.0
        position = { rule = "banded", first = 1.0, head_fraction = 0.2, head = 0.5, body_fraction = 0.5, body = 0.2 }
        title = { rule = "jaccard", weight = 1.0 }
        "#,
    );
    assert!(err.is_err());
}

#[test]
fn both_profiles_keep_the_lead() {
    let mut long_body = String::from(BODY);
    for i in 0..30 {
        long_body.push_str(&format!(" Filler line {i} mentions nothing much."));
    }
    let article = Article::new(TITLE, "State Desk");

    let advanced = Summarizer::default().summarize(&article, &long_body).unwrap();
    let legacy_cfg = SummarizerConfig::from_toml_str("[ranking]\nprofile = \"legacy\"").unwrap();
    let legacy = Summarizer::new(legacy_cfg)
        .summarize(&article, &long_body)
        .unwrap();

    // Both keep the lead and return the same feature bag; only ranking differs.
    assert!(advanced.content.contains("The state cabinet met on Tuesday"));
    assert!(legacy.content.contains("The state cabinet met on Tuesday"));
    assert_eq!(advanced.key_phrases, legacy.key_phrases);
}
