//! Illustrative image URLs from the pollinations prompt endpoint.

use crate::types::FlowerRecommendation;

const IMAGE_ENDPOINT: &str = "https://image.pollinations.ai/prompt/";

/// Seed offset added to a card's rank.
pub const CARD_SEED_OFFSET: u32 = 100;

/// Seed for the landing background.
pub const LANDING_SEED: u32 = 42;

/// Image URL for a recommendation card.
pub fn flower_image_url(flower: &FlowerRecommendation) -> String {
    image_url_for(flower.search_name(), flower.rank)
}

/// Image URL for an arbitrary flower name at a given rank.
pub fn image_url_for(search_name: &str, rank: u32) -> String {
    format!(
        "{IMAGE_ENDPOINT}close%20up%20photo%20of%20{}%20flower%20blooming%20in%20a%20garden,\
         %20natural%20sunlight,%20highly%20detailed,%20botanical%20photography,%208k\
         ?width=800&height=600&nologo=true&seed={}",
        urlencoding::encode(search_name),
        rank.saturating_add(CARD_SEED_OFFSET)
    )
}

/// Background image shown on the landing screen.
pub fn landing_background_url() -> String {
    format!(
        "{IMAGE_ENDPOINT}oil%20painting%20style%20landscape%20of%20a%20mysterious%20and%20beautiful\
         %20flower%20garden,%20claude%20monet%20style,%20impressionism,%20thick%20brush%20strokes,\
         %20soft%20pastel%20colors,%20warm%20sunlight,%20masterpiece\
         ?width=1920&height=1080&nologo=true&seed={LANDING_SEED}"
    )
}
