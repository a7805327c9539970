//! Startup seeding: admin bootstrap and optional demo content.
//!
//! The admin password hash comes from the environment; hashing happens here,
//! never in the store. Demo seeding is a best-effort sequence of independent
//! inserts with no atomicity. The resulting counts are logged so a partial
//! seed is visible.

use bcrypt::{hash, BcryptError, DEFAULT_COST};
use serde_json::json;

use crate::state::AppState;
use crate::store::models::{NewAiAgent, NewProject, NewService, NewTestimonial, NewUser};

/// Development fallback. Production startup refuses to run with this value
/// (see `run()` in lib.rs).
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Resolve the admin password hash from the environment:
/// ADMIN_HASH_PASSWORD (already hashed) wins, then ADMIN_PASSWORD (hashed
/// here), then the development default.
fn admin_password_hash() -> Result<String, BcryptError> {
    if let Ok(hashed) = std::env::var("ADMIN_HASH_PASSWORD") {
        return Ok(hashed);
    }
    let plain =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
    hash(&plain, DEFAULT_COST)
}

/// Ensure the admin user exists. Repeat-safe: an existing user of the same
/// username is left untouched.
pub async fn seed_admin(state: &AppState) -> Result<(), BcryptError> {
    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());

    if state.store.get_user_by_username(&username).await.is_some() {
        tracing::debug!("admin user '{}' already exists, skipping seed", username);
        return Ok(());
    }

    let email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = admin_password_hash()?;

    let user = state
        .store
        .create_user(NewUser {
            username,
            password,
            email,
        })
        .await;
    tracing::info!(user_id = %user.id, username = %user.username, "admin user seeded");

    Ok(())
}

/// Seed demo content for local development. A sequence of independent
/// inserts: no rollback on partial completion, counts are logged instead.
pub async fn seed_demo_content(state: &AppState) {
    let services = [
        NewService {
            title: "Web Design".to_string(),
            description: "Custom marketing sites that convert.".to_string(),
            icon: "layout".to_string(),
            price: "from $2,500".to_string(),
            order: Some(0),
            active: None,
        },
        NewService {
            title: "Brand Identity".to_string(),
            description: "Logos, palettes and voice guidelines.".to_string(),
            icon: "palette".to_string(),
            price: "from $1,800".to_string(),
            order: Some(1),
            active: None,
        },
    ];
    for service in services {
        state.store.insert_service(service).await;
    }

    let projects = [
        NewProject {
            title: "Harbor & Co. relaunch".to_string(),
            description: "Full redesign and CMS migration for a retail brand.".to_string(),
            category: "web".to_string(),
            image: "/images/projects/harbor.jpg".to_string(),
            link: Some("https://harborandco.example".to_string()),
            technologies: Some("React, Tailwind".to_string()),
            order: Some(0),
            featured: Some(true),
            active: None,
        },
        NewProject {
            title: "Fieldnote campaign site".to_string(),
            description: "Launch microsite with lead capture.".to_string(),
            category: "marketing".to_string(),
            image: "/images/projects/fieldnote.jpg".to_string(),
            link: None,
            technologies: None,
            order: Some(1),
            featured: None,
            active: None,
        },
    ];
    for project in projects {
        state.store.insert_project(project).await;
    }

    let agents = [
        NewAiAgent {
            name: "Reception Agent".to_string(),
            description: "Answers inbound questions and books calls.".to_string(),
            icon: "bot".to_string(),
            features: Some(vec![
                "24/7 availability".to_string(),
                "Calendar booking".to_string(),
            ]),
            price: "$499".to_string(),
            price_type: None,
            category: "customer_service".to_string(),
            capabilities: None,
            integrations: Some(vec!["Slack".to_string(), "HubSpot".to_string()]),
            order: Some(0),
            featured: Some(true),
            active: None,
        },
        NewAiAgent {
            name: "Outreach Agent".to_string(),
            description: "Drafts and schedules personalized follow-ups.".to_string(),
            icon: "send".to_string(),
            features: None,
            price: "$799".to_string(),
            price_type: None,
            category: "sales".to_string(),
            capabilities: None,
            integrations: None,
            order: Some(1),
            featured: None,
            active: None,
        },
    ];
    for agent in agents {
        state.store.insert_ai_agent(agent).await;
    }

    state
        .store
        .insert_testimonial(NewTestimonial {
            name: "Dana Reyes".to_string(),
            role: "Founder".to_string(),
            company: Some("Harbor & Co.".to_string()),
            quote: "They rebuilt our site in six weeks and leads doubled.".to_string(),
            image: "/images/testimonials/dana.jpg".to_string(),
            rating: None,
            order: Some(0),
            active: None,
        })
        .await;

    state
        .store
        .set_setting("hero", json!({"headline": "We build sites that sell", "cta": "Get a quote"}))
        .await;
    state
        .store
        .set_setting("contact", json!({"email": "hello@agency.example", "phone": "+1 555 0100"}))
        .await;

    let counts = state.store.counts().await;
    tracing::info!(
        services = counts.services,
        projects = counts.projects,
        ai_agents = counts.ai_agents,
        testimonials = counts.testimonials,
        settings = counts.settings,
        "demo content seeded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_admin_is_repeat_safe() {
        let state = AppState::new();
        seed_admin(&state).await.unwrap();
        let first = state.store.get_user_by_username("admin").await.unwrap();

        seed_admin(&state).await.unwrap();
        let second = state.store.get_user_by_username("admin").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(state.store.counts().await.users, 1);
    }

    #[tokio::test]
    async fn test_demo_content_populates_collections() {
        let state = AppState::new();
        seed_demo_content(&state).await;

        let counts = state.store.counts().await;
        assert!(counts.services >= 2);
        assert!(counts.projects >= 2);
        assert!(counts.ai_agents >= 2);
        assert!(counts.testimonials >= 1);
        assert!(counts.settings >= 2);

        // Public listings see the seeded content.
        assert!(!state.store.all_projects(false).await.is_empty());
        assert!(!state.store.all_ai_agents(false).await.is_empty());
    }
}
