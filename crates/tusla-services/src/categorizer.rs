//! AI-assisted post categorization
//!
//! When a post arrives without a category, the description is sent to the
//! configured model together with the known category names, and the answer is
//! mapped back to a category id. Categorization is best-effort: any failure
//! leaves the post uncategorized rather than failing the request.

use uuid::Uuid;

use tusla_core::models::Category;
use tusla_db::CategoryRepository;

use crate::ollama::OllamaClient;

/// Orchestrates category suggestion for new posts
#[derive(Clone)]
pub struct CategorizerService {
    categories: CategoryRepository,
    ollama: OllamaClient,
}

impl CategorizerService {
    pub fn new(categories: CategoryRepository, ollama: OllamaClient) -> Self {
        Self { categories, ollama }
    }

    /// Check that the backing model endpoint is reachable.
    pub async fn health_check(&self) -> anyhow::Result<bool> {
        self.ollama.health_check().await
    }

    /// Suggest a category id for a post. Returns `None` when the category
    /// list is empty, the model is unreachable, or the answer matches no
    /// known category.
    #[tracing::instrument(skip(self, title, description))]
    pub async fn suggest_category(&self, title: &str, description: &str) -> Option<Uuid> {
        let categories = match self.categories.list_categories().await {
            Ok(categories) if !categories.is_empty() => categories,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping categorization: failed to load categories");
                return None;
            }
        };

        let prompt = build_category_prompt(title, description, &categories);

        let answer = match self.ollama.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping categorization: model call failed");
                return None;
            }
        };

        match match_category(&answer, &categories) {
            Some(id) => Some(id),
            None => {
                tracing::debug!(answer = %answer, "Model answer matched no category");
                None
            }
        }
    }
}

/// Build the classification prompt listing every known category name.
pub fn build_category_prompt(title: &str, description: &str, categories: &[Category]) -> String {
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    format!(
        "Classify the following help request into exactly one of these categories: {}.\n\
         Respond with the category name only, nothing else.\n\n\
         Title: {}\nDescription: {}",
        names.join(", "),
        title,
        description
    )
}

/// Map a model answer back to a category id, case-insensitively. The answer
/// may carry surrounding quotes or whitespace.
pub fn match_category(answer: &str, categories: &[Category]) -> Option<Uuid> {
    let normalized = answer.trim().trim_matches(['"', '\'', '.']).to_lowercase();
    categories
        .iter()
        .find(|c| c.name.to_lowercase() == normalized)
        .map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            endpoint: format!("/{}", name.to_lowercase()),
            can_volunteer: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_prompt_lists_all_categories() {
        let categories = vec![category("Хүнс"), category("Эрүүл мэнд")];
        let prompt = build_category_prompt("Тусламж", "Хоол хэрэгтэй", &categories);
        assert!(prompt.contains("Хүнс"));
        assert!(prompt.contains("Эрүүл мэнд"));
        assert!(prompt.contains("Хоол хэрэгтэй"));
    }

    #[test]
    fn test_match_category_case_insensitive() {
        let categories = vec![category("Education"), category("Food")];
        let expected = categories[1].id;
        assert_eq!(match_category("food", &categories), Some(expected));
        assert_eq!(match_category("  FOOD \n", &categories), Some(expected));
        assert_eq!(match_category("\"Food\"", &categories), Some(expected));
    }

    #[test]
    fn test_match_category_unknown_answer() {
        let categories = vec![category("Education")];
        assert_eq!(match_category("Something else", &categories), None);
        assert_eq!(match_category("", &categories), None);
    }
}
