//! Score aggregation and improvement suggestions.
//!
//! Both scores are additive point tables over the raw analyses, rounded and
//! capped at 100. Conditions within a table are independent; tiers of the
//! same metric are mutually exclusive by their ranges.
//!
//! ## SEO points
//!
//! | condition                            | points |
//! |--------------------------------------|--------|
//! | keyword in title                     | 15     |
//! | keyword in first paragraph           | 10     |
//! | keyword in headings                  | 10     |
//! | keyword in URL                       | 5      |
//! | density in (0, 2.5]                  | 15     |
//! | density in (2.5, 4]                  | 7.5    |
//! | title length in [30, 60]             | 15     |
//! | title length in (0, 30)              | 7.5    |
//! | description length in [120, 155]     | 15     |
//! | description length in (0, 120)       | 7.5    |
//!
//! ## Readability points
//!
//! | condition                            | points |
//! |--------------------------------------|--------|
//! | reading ease ≥ 60                    | 25     |
//! | reading ease in [30, 60)             | 15     |
//! | passive voice ≤ 10%                  | 25     |
//! | passive voice in (10, 20]%           | 15     |
//! | sentence length ≤ 20                 | 25     |
//! | sentence length in (20, 25]          | 15     |
//! | paragraph length ≤ 4                 | 15     |
//! | paragraph length in (4, 6]           | 10     |
//! | transition words ≥ 30%               | 10     |
//! | transition words in [20, 30)%        | 5      |
//!
//! Content with no words scores zero for readability.

use crate::types::{ReadabilityAnalysis, SeoAnalysis};
use serde::Serialize;

/// Aggregated result of one scoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub seo_score: u32,
    pub readability_score: u32,
    pub improvements: Vec<String>,
}

/// Score both analyses and collect suggestions. Pure and deterministic.
pub fn score(seo: &SeoAnalysis, readability: &ReadabilityAnalysis) -> ScoreCard {
    ScoreCard {
        seo_score: seo_score(seo),
        readability_score: readability_score(readability),
        improvements: improvements(seo),
    }
}

/// Fill the score and suggestion fields of both analyses in place.
pub fn apply(seo: &mut SeoAnalysis, readability: &mut ReadabilityAnalysis) -> ScoreCard {
    let card = score(seo, readability);
    seo.seo_score = card.seo_score;
    seo.improvements = card.improvements.clone();
    readability.readability_score = card.readability_score;
    card
}

fn normalize(points: f64) -> u32 {
    (points.round() as u32).min(100)
}

pub fn seo_score(seo: &SeoAnalysis) -> u32 {
    let mut points = 0.0;

    if seo.keyword_in_title {
        points += 15.0;
    }
    if seo.keyword_in_first_paragraph {
        points += 10.0;
    }
    if seo.keyword_in_headings {
        points += 10.0;
    }
    if seo.keyword_in_url {
        points += 5.0;
    }

    let density = seo.keyword_density;
    if density > 0.0 && density <= 2.5 {
        points += 15.0;
    } else if density > 2.5 && density <= 4.0 {
        points += 7.5;
    }

    match seo.title_length {
        30..=60 => points += 15.0,
        1..30 => points += 7.5,
        _ => {}
    }

    match seo.description_length {
        120..=155 => points += 15.0,
        1..120 => points += 7.5,
        _ => {}
    }

    normalize(points)
}

pub fn readability_score(readability: &ReadabilityAnalysis) -> u32 {
    if readability.analyzed_words == 0 {
        return 0;
    }
    let mut points = 0.0;

    if readability.reading_ease >= 60.0 {
        points += 25.0;
    } else if readability.reading_ease >= 30.0 {
        points += 15.0;
    }

    if readability.passive_voice_pct <= 10.0 {
        points += 25.0;
    } else if readability.passive_voice_pct <= 20.0 {
        points += 15.0;
    }

    if readability.avg_sentence_length <= 20.0 {
        points += 25.0;
    } else if readability.avg_sentence_length <= 25.0 {
        points += 15.0;
    }

    if readability.avg_paragraph_length <= 4.0 {
        points += 15.0;
    } else if readability.avg_paragraph_length <= 6.0 {
        points += 10.0;
    }

    if readability.transition_word_pct >= 30.0 {
        points += 10.0;
    } else if readability.transition_word_pct >= 20.0 {
        points += 5.0;
    }

    normalize(points)
}

/// Ordered suggestions. Each check contributes at most one message.
pub fn improvements(seo: &SeoAnalysis) -> Vec<String> {
    let mut tips = Vec::new();
    let keyword = seo.focus_keyword.as_str();

    if keyword.is_empty() {
        tips.push("Add a focus keyword to analyze SEO performance".to_string());
    }

    if seo.title_length == 0 {
        tips.push("Add a meta title for better SEO".to_string());
    } else if seo.title_length < 30 {
        tips.push("Meta title is too short. Aim for 50-60 characters".to_string());
    } else if seo.title_length > 60 {
        tips.push("Meta title is too long. Keep it under 60 characters".to_string());
    }

    if seo.description_length == 0 {
        tips.push("Add a meta description for better SEO".to_string());
    } else if seo.description_length < 120 {
        tips.push("Meta description is too short. Aim for 120-155 characters".to_string());
    } else if seo.description_length > 155 {
        tips.push("Meta description is too long. Keep it under 155 characters".to_string());
    }

    if keyword.is_empty() {
        return tips;
    }

    if !seo.keyword_in_title {
        tips.push(format!("Include the focus keyword \"{keyword}\" in the title"));
    }
    if !seo.keyword_in_first_paragraph {
        tips.push(format!(
            "Include the focus keyword \"{keyword}\" in the first paragraph"
        ));
    }
    if seo.keyword_density == 0.0 {
        tips.push(format!("Include the focus keyword \"{keyword}\" in your content"));
    } else if seo.keyword_density > 4.0 {
        tips.push(format!(
            "Keyword density for \"{keyword}\" is too high ({}%). Aim for 1-2.5%",
            one_decimal(seo.keyword_density)
        ));
    }

    tips
}

/// `value` with one decimal, exact halves rounded up (6.25 reads 6.3).
///
/// `{:.1}` rounds exact halves to even. Only values that are odd multiples of
/// 0.25 are exact halves at one decimal; anything else already formats right.
fn one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        format!("{:.1}", value + 0.05)
    } else {
        format!("{value:.1}")
    }
}
