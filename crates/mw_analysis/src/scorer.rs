//! Rule-based relevance scoring.
//!
//! Scoring runs an ordered list of named steps over the lowercased article
//! text. A step either rejects the article outright (score 0.0) or adds to
//! the running score. After the steps a trust floor and the source's trust
//! modifier are applied.

use mw_core::{truncate_chars, Article};

use crate::lexicon::{
    contains_any, first_match, matches, CORE_TOPICS, GENERAL_NEWS_DOMAINS, HIGH_TRUST_DOMAINS,
    IN_SCOPE_SECTORS, LABOR_MARKET_KEYWORDS, LOW_TRUST_DOMAINS, MEDIUM_TRUST_DOMAINS,
    NON_SWEDISH_INDICATORS, OUT_OF_SCOPE_SECTORS, PERFORMANCE_TERMS, PERFORMING_ARTS_TERMS,
    REVIEW_INDICATORS, SWEDEN_MARKERS, WORK_ANGLE_KEYWORDS,
};

const BODY_PREFIX_CHARS: usize = 500;
const SECTOR_WEIGHT: f64 = 0.3;
const TOPIC_WEIGHT: f64 = 0.4;
const MAX_COUNTED_MATCHES: usize = 3;
const TRUST_FLOOR: f64 = 0.1;
const NO_SIGNAL: &str = "no strong signal";

pub const HIGH_TRUST_MODIFIER: f64 = 2.0;
pub const MEDIUM_TRUST_MODIFIER: f64 = 1.5;
pub const LOW_TRUST_MODIFIER: f64 = 0.7;
pub const DEFAULT_TRUST_MODIFIER: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustTier {
    High,
    Medium,
    Low,
    Default,
}

impl TrustTier {
    /// Substring match against the curated domain lists, high before medium
    /// before low.
    pub fn for_domain(domain: &str) -> Self {
        if contains_any(domain, HIGH_TRUST_DOMAINS) {
            TrustTier::High
        } else if contains_any(domain, MEDIUM_TRUST_DOMAINS) {
            TrustTier::Medium
        } else if contains_any(domain, LOW_TRUST_DOMAINS) {
            TrustTier::Low
        } else {
            TrustTier::Default
        }
    }

    pub fn modifier(&self) -> f64 {
        match self {
            TrustTier::High => HIGH_TRUST_MODIFIER,
            TrustTier::Medium => MEDIUM_TRUST_MODIFIER,
            TrustTier::Low => LOW_TRUST_MODIFIER,
            TrustTier::Default => DEFAULT_TRUST_MODIFIER,
        }
    }
}

/// Lowercased inputs shared by every step.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    pub text: String,
    pub source: String,
    pub trust: TrustTier,
}

impl ScoringContext {
    pub fn from_article(article: &Article) -> Self {
        let text = format!(
            "{} {} {}",
            article.title,
            article.summary,
            truncate_chars(&article.body_text, BODY_PREFIX_CHARS)
        )
        .to_lowercase();
        let source = match article.domain.as_deref() {
            Some(domain) if !domain.is_empty() => domain.to_lowercase(),
            _ => article.source.to_lowercase(),
        };
        let trust = TrustTier::for_domain(&source);
        Self { text, source, trust }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Reject(String),
    Accumulate { score: f64, reason: Option<String> },
}

impl Verdict {
    fn pass() -> Self {
        Verdict::Accumulate { score: 0.0, reason: None }
    }
}

pub type ScoringStep = fn(&ScoringContext) -> Verdict;

/// Evaluated in order; the first rejection ends scoring.
pub const STEPS: &[(&str, ScoringStep)] = &[
    ("geography", geography_gate),
    ("work_angle", work_angle_gate),
    ("review", review_gate),
    ("sector", sector_score),
    ("topic", topic_score),
];

pub fn geography_gate(ctx: &ScoringContext) -> Verdict {
    if contains_any(&ctx.text, NON_SWEDISH_INDICATORS) && !contains_any(&ctx.text, SWEDEN_MARKERS) {
        return Verdict::Reject("foreign geography".to_string());
    }
    Verdict::pass()
}

pub fn work_angle_gate(ctx: &ScoringContext) -> Verdict {
    let general_source = contains_any(&ctx.source, GENERAL_NEWS_DOMAINS);
    if general_source && !contains_any(&ctx.text, LABOR_MARKET_KEYWORDS) {
        return Verdict::Reject("no labour-market angle (general news source)".to_string());
    }
    Verdict::pass()
}

/// Catches reviews and culture journalism without a work angle. Core
/// high-trust sources are exempt.
pub fn review_gate(ctx: &ScoringContext) -> Verdict {
    if ctx.trust.modifier() >= HIGH_TRUST_MODIFIER {
        return Verdict::pass();
    }
    if contains_any(&ctx.text, WORK_ANGLE_KEYWORDS) {
        return Verdict::pass();
    }
    if let Some(term) = first_match(&ctx.text, PERFORMANCE_TERMS) {
        return Verdict::Reject(format!("review/entertainment: {}", term));
    }
    if contains_any(&ctx.text, PERFORMING_ARTS_TERMS) {
        if let Some(indicator) = first_match(&ctx.text, REVIEW_INDICATORS) {
            return Verdict::Reject(format!("review/entertainment: {}", indicator));
        }
    }
    Verdict::pass()
}

pub fn sector_score(ctx: &ScoringContext) -> Verdict {
    let in_scope = matches(&ctx.text, IN_SCOPE_SECTORS);
    if in_scope.is_empty() {
        if let Some(term) = first_match(&ctx.text, OUT_OF_SCOPE_SECTORS) {
            return Verdict::Reject(format!("out-of-scope sector: {}", term));
        }
        return Verdict::pass();
    }
    Verdict::Accumulate {
        score: SECTOR_WEIGHT * in_scope.len().min(MAX_COUNTED_MATCHES) as f64,
        reason: Some(format!("sector: {}", head(&in_scope))),
    }
}

pub fn topic_score(ctx: &ScoringContext) -> Verdict {
    let topics = matches(&ctx.text, CORE_TOPICS);
    if topics.is_empty() {
        return Verdict::pass();
    }
    Verdict::Accumulate {
        score: TOPIC_WEIGHT * topics.len().min(MAX_COUNTED_MATCHES) as f64,
        reason: Some(format!("topic: {}", head(&topics))),
    }
}

fn head(terms: &[&str]) -> String {
    terms.iter().take(MAX_COUNTED_MATCHES).copied().collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceScorer;

impl RelevanceScorer {
    pub fn new() -> Self {
        Self
    }

    /// Returns a score in [0, 1] and a human-readable rationale.
    pub fn calculate_relevance(&self, article: &Article) -> (f64, String) {
        let ctx = ScoringContext::from_article(article);
        let mut score = 0.0;
        let mut reasons: Vec<String> = Vec::new();

        for (_, step) in STEPS {
            match step(&ctx) {
                Verdict::Reject(reason) => return (0.0, reason),
                Verdict::Accumulate { score: delta, reason } => {
                    score += delta;
                    reasons.extend(reason);
                }
            }
        }

        let modifier = ctx.trust.modifier();
        if modifier > MEDIUM_TRUST_MODIFIER && score < TRUST_FLOOR {
            score = TRUST_FLOOR;
            reasons.push("high-trust source baseline".to_string());
        }

        let final_score = (score * modifier).min(1.0);
        let reason = if reasons.is_empty() {
            NO_SIGNAL.to_string()
        } else {
            reasons.join("; ")
        };
        (final_score, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(title: &str, domain: &str, body: &str) -> Article {
        let mut a = Article::new(title, format!("https://{}/a", domain), domain, Utc::now(), "")
            .with_body(body);
        a.domain = Some(domain.to_string());
        a
    }

    fn ctx(text: &str, domain: &str) -> ScoringContext {
        ScoringContext {
            text: text.to_string(),
            source: domain.to_string(),
            trust: TrustTier::for_domain(domain),
        }
    }

    #[test]
    fn test_trust_tiers() {
        assert_eq!(TrustTier::for_domain("scensverige.se"), TrustTier::High);
        // listed as both high and medium; high wins
        assert_eq!(TrustTier::for_domain("musikerforbundet.se"), TrustTier::High);
        assert_eq!(TrustTier::for_domain("regeringen.se"), TrustTier::Medium);
        assert_eq!(TrustTier::for_domain("arbetet.se"), TrustTier::Low);
        assert_eq!(TrustTier::for_domain("example.com"), TrustTier::Default);
    }

    #[test]
    fn test_geography_gate() {
        assert!(matches!(geography_gate(&ctx("strejk i tyskland", "x.se")), Verdict::Reject(_)));
        assert_eq!(
            geography_gate(&ctx("tyskland och sverige jämförs", "x.se")),
            Verdict::pass()
        );
        assert_eq!(geography_gate(&ctx("nyheter från malmö", "x.se")), Verdict::pass());
    }

    #[test]
    fn test_work_angle_gate_only_for_general_news() {
        assert!(matches!(
            work_angle_gate(&ctx("ny kulturminister utsedd", "svt.se")),
            Verdict::Reject(_)
        ));
        assert_eq!(work_angle_gate(&ctx("facket kräver besked", "svt.se")), Verdict::pass());
        assert_eq!(work_angle_gate(&ctx("ny kulturminister utsedd", "scenochfilm.se")), Verdict::pass());
    }

    #[test]
    fn test_review_gate() {
        assert_eq!(
            review_gate(&ctx("en gripande föreställning", "example.com")),
            Verdict::Reject("review/entertainment: föreställning".to_string())
        );
        assert_eq!(
            review_gate(&ctx("operan firar jubileum", "example.com")),
            Verdict::Reject("review/entertainment: jubileum".to_string())
        );
        // work angle clears it
        assert_eq!(
            review_gate(&ctx("föreställning ställs in efter varsel", "example.com")),
            Verdict::pass()
        );
        // high-trust sources are exempt
        assert_eq!(review_gate(&ctx("en gripande föreställning", "trs.se")), Verdict::pass());
    }

    #[test]
    fn test_sector_caps_at_three_matches() {
        let verdict = sector_score(&ctx("teater, opera, balett och dans i kulturen", "x.se"));
        match verdict {
            Verdict::Accumulate { score, reason } => {
                assert!((score - 0.9).abs() < 1e-9);
                assert_eq!(reason.as_deref(), Some("sector: teater, opera, balett"));
            }
            other => panic!("unexpected verdict {:?}", other),
        }
    }

    #[test]
    fn test_out_of_scope_sector_scores_zero() {
        let scorer = RelevanceScorer::new();
        let a = article("Varsel på kycklingfabrik", "example.com", "Uppsägning och arbetsbrist.");
        let (score, reason) = scorer.calculate_relevance(&a);
        assert_eq!(score, 0.0);
        assert_eq!(reason, "out-of-scope sector: fabrik");

        // even a high-trust domain cannot lift it
        let a = article("Varsel på kycklingfabrik", "trr.se", "Uppsägning och arbetsbrist.");
        assert_eq!(scorer.calculate_relevance(&a).0, 0.0);
    }

    #[test]
    fn test_offsetting_in_scope_term() {
        let scorer = RelevanceScorer::new();
        let a = article("Teaterns verkstad varslar", "example.com", "Varsel om uppsägning.");
        let (score, _) = scorer.calculate_relevance(&a);
        assert!(score > 0.0);
    }

    #[test]
    fn test_trust_floor() {
        let scorer = RelevanceScorer::new();
        let a = article("Årsmöte hölls i går", "fremia.se", "");
        let (score, reason) = scorer.calculate_relevance(&a);
        assert!((score - 0.2).abs() < 1e-9);
        assert_eq!(reason, "high-trust source baseline");

        // medium trust has no floor
        let a = article("Årsmöte hölls i går", "regeringen.se", "");
        assert_eq!(scorer.calculate_relevance(&a), (0.0, NO_SIGNAL.to_string()));
    }

    #[test]
    fn test_low_trust_dampens() {
        let scorer = RelevanceScorer::new();
        let a = article("Nytt kollektivavtal för musiker", "arbetet.se", "");
        let (score, reason) = scorer.calculate_relevance(&a);
        // (0.6 + 0.4) * 0.7
        assert!((score - 0.7).abs() < 1e-9);
        assert_eq!(reason, "sector: musik, musiker; topic: kollektivavtal");
    }

    #[test]
    fn test_malmo_opera_layoffs() {
        let scorer = RelevanceScorer::new();
        let a = article(
            "Varsel på Malmö Opera – 20 tjänster försvinner",
            "sverigesradio.se",
            "Ledningen har lagt ett varsel om uppsägning. Orsaken är arbetsbrist efter minskade anslag.",
        );
        let (score, reason) = scorer.calculate_relevance(&a);
        assert!(score > 0.0);
        assert_eq!(score, 1.0);
        assert!(reason.contains("topic: uppsägning, arbetsbrist, varsel"));
    }

    #[test]
    fn test_tv4_review_scores_zero() {
        let scorer = RelevanceScorer::new();
        let a = article(
            "Gör vild föreställning om Folkhemmets mormor",
            "tv4.se",
            "En gripande föreställning med starka rollprestationer. En publiksuccé.",
        );
        assert_eq!(scorer.calculate_relevance(&a).0, 0.0);

        // the review gate alone also catches it
        let review = ScoringContext::from_article(&a);
        assert!(matches!(review_gate(&review), Verdict::Reject(_)));
    }

    #[test]
    fn test_source_label_used_without_domain() {
        let mut a = article("Årsmöte hölls i går", "trs.se", "");
        a.domain = None;
        a.source = "TRS.se".to_string();
        assert!(scorer_score(&a) >= 0.1);
    }

    fn scorer_score(a: &Article) -> f64 {
        RelevanceScorer::new().calculate_relevance(a).0
    }
}
