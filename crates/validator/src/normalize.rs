use crate::schema::FrontMatter;
use blog_kit_core::slug::category_slug;
use blog_kit_core::types::{ClosedSet, Post, READING_TIME_PLACEHOLDER};

/// Derive the computed fields of a validated post.
///
/// Runs after defaults are applied: the alt text falls back to the final
/// title and the slug is computed from the final category.
pub fn normalize(front_matter: FrontMatter) -> Post {
    let FrontMatter {
        title,
        description,
        pub_date,
        updated_date,
        author,
        hero_image,
        hero_image_alt,
        category,
        tags,
        mood,
        series,
        series_order,
        draft,
        featured,
        language,
        reading_time,
        seo,
    } = front_matter;

    let reading_time = reading_time
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| READING_TIME_PLACEHOLDER.to_string());

    let hero_image_alt = match (&hero_image, hero_image_alt) {
        (Some(_), alt) if alt.as_deref().is_none_or(str::is_empty) => Some(title.clone()),
        (_, alt) => alt,
    };

    Post {
        category_slug: category_slug(category.as_str()),
        title,
        description,
        pub_date,
        updated_date,
        author,
        hero_image,
        hero_image_alt,
        category,
        tags,
        mood,
        series,
        series_order,
        draft,
        featured,
        language,
        reading_time,
        seo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_kit_core::types::{Category, ImageAsset, Language};
    use chrono::{TimeZone, Utc};

    fn front_matter() -> FrontMatter {
        FrontMatter {
            title: "Hello World".to_string(),
            description: "First post".to_string(),
            pub_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_date: None,
            author: "Khoi Van".to_string(),
            hero_image: None,
            hero_image_alt: None,
            category: Category::Engineering,
            tags: vec![],
            mood: None,
            series: None,
            series_order: None,
            draft: false,
            featured: false,
            language: Language::Vi,
            reading_time: None,
            seo: None,
        }
    }

    fn hero() -> ImageAsset {
        ImageAsset {
            src: "src/assets/hero.png".to_string(),
            width: 1200,
            height: 630,
            format: "png".to_string(),
        }
    }

    #[test]
    fn test_reading_time_placeholder() {
        let post = normalize(front_matter());
        assert_eq!(post.reading_time, READING_TIME_PLACEHOLDER);

        let mut fm = front_matter();
        fm.reading_time = Some(String::new());
        assert_eq!(normalize(fm).reading_time, READING_TIME_PLACEHOLDER);

        let mut fm = front_matter();
        fm.reading_time = Some("12 min read".to_string());
        assert_eq!(normalize(fm).reading_time, "12 min read");
    }

    #[test]
    fn test_alt_text_falls_back_to_title() {
        let mut fm = front_matter();
        fm.hero_image = Some(hero());
        assert_eq!(normalize(fm).hero_image_alt.as_deref(), Some("Hello World"));

        let mut fm = front_matter();
        fm.hero_image = Some(hero());
        fm.hero_image_alt = Some(String::new());
        assert_eq!(normalize(fm).hero_image_alt.as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_explicit_alt_text_is_kept() {
        let mut fm = front_matter();
        fm.hero_image = Some(hero());
        fm.hero_image_alt = Some("A mountain at dawn".to_string());
        assert_eq!(
            normalize(fm).hero_image_alt.as_deref(),
            Some("A mountain at dawn")
        );
    }

    #[test]
    fn test_no_alt_text_without_hero_image() {
        let post = normalize(front_matter());
        assert_eq!(post.hero_image_alt, None);
    }

    #[test]
    fn test_category_slug_follows_category() {
        for category in Category::ALL {
            let mut fm = front_matter();
            fm.category = *category;
            assert_eq!(normalize(fm).category_slug, category.as_str());
        }
    }
}
