//! Keyword-based category inference from playlist titles

use crate::models::Category;

/// Checked in order; the first category with a matching keyword wins
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::MotionGraphics,
        &["motion", "graphics", "logo", "kinetic", "typography"],
    ),
    (
        Category::Animation,
        &["animation", "animated", "2d", "3d", "cartoon"],
    ),
    (
        Category::Vfx,
        &["vfx", "visual effects", "compositing", "cgi"],
    ),
    (
        Category::Commercial,
        &["commercial", "advert", "promo", "brand"],
    ),
    (Category::MusicVideo, &["music"]),
    (
        Category::Corporate,
        &["corporate", "explainer", "training", "testimonial"],
    ),
    (Category::Documentary, &["documentary", "docu"]),
    (
        Category::SocialMedia,
        &["social", "shorts", "reel", "tiktok", "instagram"],
    ),
];

/// Infer a category from a title by keyword presence
pub fn infer_category(title: &str) -> Category {
    let lower = title.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_graphics_titles() {
        assert_eq!(infer_category("Motion Graphics"), Category::MotionGraphics);
        assert_eq!(infer_category("Logo Animations"), Category::MotionGraphics);
        assert_eq!(infer_category("KINETIC type"), Category::MotionGraphics);
    }

    #[test]
    fn test_keyword_order_breaks_ties() {
        // Matches both Animation and VFX; Animation is checked first
        assert_eq!(infer_category("3D VFX Reel"), Category::Animation);
        assert_eq!(infer_category("2D Explainers"), Category::Animation);
    }

    #[test]
    fn test_other_categories() {
        assert_eq!(infer_category("Compositing Breakdowns"), Category::Vfx);
        assert_eq!(infer_category("TV Commercials"), Category::Commercial);
        assert_eq!(infer_category("Music Videos"), Category::MusicVideo);
        assert_eq!(infer_category("Corporate Films"), Category::Corporate);
        assert_eq!(infer_category("Short Documentaries"), Category::Documentary);
        assert_eq!(infer_category("Instagram Cutdowns"), Category::SocialMedia);
    }

    #[test]
    fn test_keywords_match_inside_words() {
        // Plain substring matching, not word boundaries
        assert_eq!(infer_category("Promotional Spots"), Category::MotionGraphics);
        assert_eq!(infer_category("Showreel 2024"), Category::SocialMedia);
        assert_eq!(infer_category("Dockside Stories"), Category::Other);
    }

    #[test]
    fn test_no_keyword_is_other() {
        assert_eq!(infer_category("Behind the Scenes"), Category::Other);
        assert_eq!(infer_category(""), Category::Other);
    }
}
