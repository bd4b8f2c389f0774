//! Keyword and domain tables used by the scorer and categorizer.
//!
//! All matching is plain substring matching over lowercased text, so every
//! entry here is lowercase.

pub const HIGH_TRUST_DOMAINS: &[&str] = &[
    "ptk.se",
    "svenskscenkonst.se",
    "arbetsgivaralliansen.se",
    "teateralliansen.se",
    "dansalliansen.se",
    "musikalliansen.se",
    "trr.se",
    "omstella.se",
    "kulturradet.se",
    "konstnarsnamnden.se",
    "fremia.se",
    "scensverige.se",
    "musikerforbundet.se",
    "nodsverige.se",
    "nysta.nu",
    "famna.se",
    "famna.org",
    "trs.se",
];

pub const MEDIUM_TRUST_DOMAINS: &[&str] = &["musikerforbundet.se", "scenochfilm.se", "regeringen.se"];

pub const LOW_TRUST_DOMAINS: &[&str] = &[
    "tn.se",
    "arbetet.se",
    "kollega.se",
    "dagenssamhalle.se",
    "publikt.se",
    "svensktnaringsliv.se",
];

/// National broadcasters and newspapers. Their articles only count when they
/// carry a labour-market angle.
pub const GENERAL_NEWS_DOMAINS: &[&str] = &[
    "sverigesradio.se",
    "tv4.se",
    "svt.se",
    "dn.se",
    "svd.se",
    "expressen.se",
    "aftonbladet.se",
];

pub const SWEDEN_MARKERS: &[&str] = &["sverige", "svensk"];

pub const NON_SWEDISH_INDICATORS: &[&str] = &[
    "bulgarien",
    "grekland",
    "grekiska",
    "danmark",
    "norge",
    "finland",
    "tyskland",
    "frankrike",
    "italien",
    "spanien",
    "polen",
    "eu-budget",
    "europeiska kommissionen",
    "bryssel",
    "usa",
    "kinda",
    "japan",
];

/// Required by the work-angle gate on general news sources.
pub const LABOR_MARKET_KEYWORDS: &[&str] = &[
    "anställ",
    "arbets",
    "omställ",
    "kollektivavtal",
    "frilans",
    "uppsäg",
    "varsel",
    "löne",
    "fack",
    "trygghet",
];

/// Any of these clears an article of being pure entertainment coverage.
pub const WORK_ANGLE_KEYWORDS: &[&str] = &[
    "anställ",
    "uppsäg",
    "varsel",
    "nedskärning",
    "sparkrav",
    "omställ",
    "kollektivavtal",
    "frilans",
    "löne",
    "personal",
    "jobb",
    "rekryter",
    "avsked",
    "pension",
    "budget",
    "arbetsmiljö",
    "fack",
    "trygghet",
    "villkor",
];

/// Terms that on their own mark an article as a performance or event piece.
pub const PERFORMANCE_TERMS: &[&str] = &[
    "föreställning",
    "pjäs",
    "uppsättning",
    "konsert",
    "spelning",
    "turné",
    "premiär",
    "repertoar",
];

pub const PERFORMING_ARTS_TERMS: &[&str] = &[
    "teater", "opera", "balett", "orkester", "dans", "musik", "konsert", "scen", "dramatik",
];

pub const REVIEW_INDICATORS: &[&str] = &[
    // review vocabulary
    "recension",
    "recenserar",
    "betyg",
    "stjärnor",
    "premiär",
    "urpremiär",
    "nypremiär",
    // productions
    "föreställning",
    "pjäs",
    "uppsättning",
    "regigrepp",
    "rollprestation",
    "scenografi",
    "manus",
    // concerts
    "konsert",
    "spelning",
    "turné",
    "album",
    "skiva",
    "låt",
    // experience
    "gripande",
    "mäktig",
    "rörande",
    "underhållande",
    "publiksuccé",
    "succé",
    "sevärd",
    "magisk",
    // portraits
    "berättar om",
    "livshistoria",
    "karriär",
    "skådespelaren",
    "artisten",
    "musikern",
    "intervju med",
    // year-in-review
    "årets bästa",
    "årets teater",
    "teateråret",
    "musikåret",
    "jubileum",
    "firande",
    "hyllning",
];

pub const IN_SCOPE_SECTORS: &[&str] = &[
    // performing arts
    "teater",
    "orkester",
    "opera",
    "balett",
    "dans",
    "musik",
    "scenkonst",
    "konserthus",
    "dramatisk",
    "scen",
    "föreställning",
    "repertoar",
    "symfoni",
    "kör",
    "dirigent",
    "musiker",
    "skådespelare",
    "dansare",
    // civil society
    "ideell",
    "idéburen",
    "civilsamhälle",
    "folkrörelse",
    "förening",
    "stiftelse",
    "folkhögskola",
    "trossamfund",
    "kyrka",
    "idrott",
    "riksidrottsförbund",
    // culture at large
    "kultur",
    "konstnär",
    "konstnärlig",
    "kulturarbetare",
    "kultursektor",
    // partner organizations
    "teateralliansen",
    "dansalliansen",
    "musikalliansen",
    "arbetsgivaralliansen",
    "svensk scenkonst",
    "ptk",
    "fremia",
];

pub const OUT_OF_SCOPE_SECTORS: &[&str] = &[
    // manufacturing
    "fabrik",
    "tillverkning",
    "industri",
    "produktion",
    "verkstad",
    "livsmedel",
    "slakteri",
    "kycklingfabrik",
    "stål",
    "papper",
    // transport
    "tåg",
    "lokförare",
    "sj ",
    "pendeltåg",
    "tunnelbana",
    "buss",
    "lastbil",
    "chaufför",
    "transport",
    "logistik",
    "flyg",
    // retail and hospitality
    "butik",
    "detaljhandel",
    "handel",
    "restaurang",
    "hotell",
    "besöksnäring",
    "krog",
    // public sector
    "kommun",
    "region",
    "landsting",
    "myndighet",
    "statlig",
    "grundskola",
    "gymnasium",
    "friskola",
    "lärare",
    // healthcare
    "sjukhus",
    "vårdcentral",
    "regionvård",
    "läkare",
    "sjuksköterska",
    "lss-boende",
    "äldreboende",
    // construction
    "bygge",
    "byggarbetsplats",
    "entreprenad",
    "anläggning",
    // visual arts
    "iaspis",
    "bild och form",
    "bildkonst",
    "formkonst",
    "konsthantverk",
    "utställning",
];

pub const CORE_TOPICS: &[&str] = &[
    "omställning",
    "omställningsstöd",
    "omställningsavtal",
    "uppsägning",
    "arbetsbrist",
    "varsel",
    "nedskärning",
    "karriärväxling",
    "karriäromställning",
    "kompetensutveckling",
    "kompetensstöd",
    "omställningsstudiestöd",
    "trygghetsråd",
    "kollektivavtal",
    "partssamverkan",
    "frilans",
    "tidsbegränsad anställning",
    "anställning",
    "arbetsmarknad",
    "arbetsmiljö",
    "lön",
];

/// Fallback categorization when no configured keyword matches. Order matters:
/// the first cluster with a hit wins.
pub const CONCEPT_CLUSTERS: &[(&str, &[&str])] = &[
    (
        "Omställning",
        &[
            "omställning",
            "uppsägning",
            "arbetsbrist",
            "varsel",
            "karriärväxling",
            "nytt jobb",
            "arbetslös",
            "arbetsförmedling",
            "trygghetsråd",
            "avgångsersättning",
            "studier",
            "yrkesväxling",
        ],
    ),
    (
        "Scenkonst",
        &[
            "scenkonst",
            "teater",
            "dans",
            "musik",
            "orkester",
            "opera",
            "balett",
            "skådespelare",
            "musiker",
            "dansare",
            "konstnär",
            "kultur",
            "föreställning",
            "scen",
            "repertoar",
            "koreograf",
            "regissör",
        ],
    ),
    (
        "Civilsamhälle",
        &[
            "civilsamhälle",
            "ideell",
            "förening",
            "stiftelse",
            "ngo",
            "folkrörelse",
            "idéburen",
            "frivillig",
            "non-profit",
        ],
    ),
    (
        "Arbetsmarknad",
        &[
            "arbetsmarknad",
            "sysselsättning",
            "rekrytering",
            "kompetens",
            "bristyrke",
            "arbetskraft",
            "lönebildning",
            "avtalsrörelse",
        ],
    ),
];

/// Markers of paid content, dropped before deduplication.
pub const ADVERTISING_MARKERS: &[&str] = &["annons", "sponsrad", "reklam", "sponsored"];

/// Second-level domain labels with a known display name.
pub const ORGANIZATION_ALIASES: &[(&str, &str)] = &[
    ("dn", "Dagens Nyheter"),
    ("svd", "Svenska Dagbladet"),
    ("sverigesradio", "Sveriges Radio"),
    ("svt", "SVT"),
    ("dagenssamhalle", "Dagens Samhälle"),
    ("arbetsvarlden", "Arbetsvärlden"),
    ("lag-avtal", "Lag & Avtal"),
    ("arbetet", "Arbetet"),
    ("kollega", "Kollega"),
    ("publikt", "Publikt"),
    ("akademikern", "Akademikern"),
];

/// Returns every term of `terms` that occurs in `text`, in table order.
pub fn matches<'a>(text: &str, terms: &[&'a str]) -> Vec<&'a str> {
    terms.iter().copied().filter(|t| text.contains(t)).collect()
}

pub fn first_match<'a>(text: &str, terms: &[&'a str]) -> Option<&'a str> {
    terms.iter().copied().find(|t| text.contains(t))
}

pub fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tables() -> Vec<&'static [&'static str]> {
        vec![
            HIGH_TRUST_DOMAINS,
            MEDIUM_TRUST_DOMAINS,
            LOW_TRUST_DOMAINS,
            GENERAL_NEWS_DOMAINS,
            NON_SWEDISH_INDICATORS,
            LABOR_MARKET_KEYWORDS,
            WORK_ANGLE_KEYWORDS,
            PERFORMANCE_TERMS,
            PERFORMING_ARTS_TERMS,
            REVIEW_INDICATORS,
            IN_SCOPE_SECTORS,
            OUT_OF_SCOPE_SECTORS,
            CORE_TOPICS,
            ADVERTISING_MARKERS,
        ]
    }

    #[test]
    fn test_tables_are_lowercase() {
        for table in all_tables() {
            for term in table {
                assert_eq!(*term, term.to_lowercase(), "term not lowercase: {}", term);
            }
        }
        for (_, terms) in CONCEPT_CLUSTERS {
            for term in *terms {
                assert_eq!(*term, term.to_lowercase());
            }
        }
    }

    #[test]
    fn test_matches_keeps_table_order() {
        let text = "varsel och uppsägning på teatern";
        assert_eq!(matches(text, CORE_TOPICS), vec!["uppsägning", "varsel"]);
        assert_eq!(first_match(text, IN_SCOPE_SECTORS), Some("teater"));
        assert!(!contains_any("inget här", ADVERTISING_MARKERS));
    }
}
