//! Prompt construction for blog and image generation.

use crate::models::GenerationRequest;

pub const CHAT_SYSTEM: &str = include_str!("../data/prompts/chat_system.txt");
pub const BLOG_USER: &str = include_str!("../data/prompts/blog_user.txt");
pub const IMAGE_INSTRUCTIONS: &str = include_str!("../data/prompts/image_instructions.txt");
pub const NO_IMAGES: &str = include_str!("../data/prompts/no_images.txt");

/// Appended to every placeholder description before it is sent to the image model.
pub const IMAGE_STYLE_SUFFIX: &str = "high quality, professional photography style";

/// System and user messages for one blog generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPrompt {
    pub system: String,
    pub user: String,
}

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

pub fn build_blog_prompt(request: &GenerationRequest) -> BlogPrompt {
    let image_count = request.image_count().to_string();

    let image_instructions = if request.image_count() > 0 {
        render(IMAGE_INSTRUCTIONS, &[("image_count", &image_count)])
    } else {
        NO_IMAGES.to_string()
    };

    let user = render(
        BLOG_USER,
        &[
            ("title", request.title()),
            ("keywords", request.keywords()),
            ("tone", &request.tone().to_string()),
            ("word_count", &request.target_word_count().to_string()),
            ("image_count", &image_count),
            ("image_instructions", image_instructions.trim_end()),
        ],
    );

    BlogPrompt {
        system: CHAT_SYSTEM.trim_end().to_string(),
        user,
    }
}

pub fn build_image_prompt(description: &str) -> String {
    format!("{}, {}", description, IMAGE_STYLE_SUFFIX)
}
