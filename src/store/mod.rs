//! In-memory entity store.
//!
//! One keyed collection per entity type, each behind its own `RwLock`.
//! The store owns every record: callers get copies on read and all mutation
//! goes through the methods here. Read-modify-write sequences (update-merge,
//! delete, setting upsert) hold the write lock for their full duration so no
//! partial write is ever observable. State is volatile and reset on restart.

pub mod models;

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use models::{
    AiAgent, AiAgentUpdate, BlogPost, BlogPostUpdate, Lead, LeadPriority, LeadStatus, LeadUpdate,
    NewAiAgent, NewBlogPost, NewLead, NewProject, NewService, NewTestimonial, NewUser, PostStatus,
    PriceType, Project, ProjectUpdate, Service, ServiceUpdate, SiteSetting, Testimonial,
    TestimonialUpdate, User,
};

/// The one failure the store can produce: update on an absent id.
/// Reads return `Option`; deletes are forgiving.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Per-collection record counts, used by the detailed health endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCounts {
    pub users: usize,
    pub leads: usize,
    pub blog_posts: usize,
    pub projects: usize,
    pub ai_agents: usize,
    pub services: usize,
    pub testimonials: usize,
    pub settings: usize,
}

#[derive(Default)]
pub struct Store {
    users: RwLock<HashMap<Uuid, User>>,
    leads: RwLock<HashMap<Uuid, Lead>>,
    blog_posts: RwLock<HashMap<Uuid, BlogPost>>,
    projects: RwLock<HashMap<Uuid, Project>>,
    ai_agents: RwLock<HashMap<Uuid, AiAgent>>,
    services: RwLock<HashMap<Uuid, Service>>,
    testimonials: RwLock<HashMap<Uuid, Testimonial>>,
    // Settings are addressed by their logical key, not by id.
    settings: RwLock<HashMap<String, SiteSetting>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn counts(&self) -> EntityCounts {
        EntityCounts {
            users: self.users.read().await.len(),
            leads: self.leads.read().await.len(),
            blog_posts: self.blog_posts.read().await.len(),
            projects: self.projects.read().await.len(),
            ai_agents: self.ai_agents.read().await.len(),
            services: self.services.read().await.len(),
            testimonials: self.testimonials.read().await.len(),
            settings: self.settings.read().await.len(),
        }
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Insert a user. The password must already be an opaque hash; the
    /// store never hashes or verifies.
    pub async fn create_user(&self, new: NewUser) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            password: new.password,
            email: new.email,
            role: "admin".to_string(),
            created_at: Utc::now(),
        };
        self.users
            .write()
            .await
            .insert(user.id, user.clone());
        user
    }

    pub async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// Exact, case-sensitive username lookup.
    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    // ========================================================================
    // Leads
    // ========================================================================

    /// Insert a lead. Every lead starts out `new`/`medium` regardless of the
    /// payload; source defaults to `contact_form`.
    pub async fn insert_lead(&self, new: NewLead) -> Lead {
        let now = Utc::now();
        let lead = Lead {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            company: new.company,
            message: new.message,
            source: new.source.unwrap_or_else(|| "contact_form".to_string()),
            status: LeadStatus::New,
            priority: LeadPriority::Medium,
            notes: None,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        };
        self.leads.write().await.insert(lead.id, lead.clone());
        lead
    }

    pub async fn get_lead(&self, id: Uuid) -> Option<Lead> {
        self.leads.read().await.get(&id).cloned()
    }

    /// All leads, newest first.
    pub async fn all_leads(&self) -> Vec<Lead> {
        let mut leads: Vec<Lead> = self.leads.read().await.values().cloned().collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        leads
    }

    pub async fn update_lead(&self, id: Uuid, updates: LeadUpdate) -> StoreResult<Lead> {
        let mut leads = self.leads.write().await;
        let lead = leads.get_mut(&id).ok_or(StoreError::NotFound("Lead"))?;

        if let Some(name) = updates.name {
            lead.name = name;
        }
        if let Some(email) = updates.email {
            lead.email = email;
        }
        if let Some(phone) = updates.phone {
            lead.phone = Some(phone);
        }
        if let Some(company) = updates.company {
            lead.company = Some(company);
        }
        if let Some(message) = updates.message {
            lead.message = message;
        }
        if let Some(status) = updates.status {
            lead.status = status;
        }
        if let Some(priority) = updates.priority {
            lead.priority = priority;
        }
        if let Some(notes) = updates.notes {
            lead.notes = Some(notes);
        }
        if let Some(assigned_to) = updates.assigned_to {
            lead.assigned_to = Some(assigned_to);
        }
        lead.updated_at = Utc::now();

        Ok(lead.clone())
    }

    pub async fn delete_lead(&self, id: Uuid) {
        self.leads.write().await.remove(&id);
    }

    // ========================================================================
    // Blog posts
    // ========================================================================

    pub async fn insert_blog_post(&self, new: NewBlogPost, author_id: Uuid) -> BlogPost {
        let now = Utc::now();
        let status = new.status.unwrap_or(PostStatus::Draft);
        let post = BlogPost {
            id: Uuid::new_v4(),
            title: new.title,
            slug: new.slug,
            excerpt: new.excerpt,
            content: new.content,
            featured_image: new.featured_image,
            category: new.category,
            tags: new.tags.unwrap_or_default(),
            status,
            author_id,
            meta_title: new.meta_title,
            meta_description: new.meta_description,
            created_at: now,
            updated_at: now,
            // A post created already published is published as of creation.
            published_at: (status == PostStatus::Published).then_some(now),
        };
        self.blog_posts
            .write()
            .await
            .insert(post.id, post.clone());
        post
    }

    pub async fn get_blog_post(&self, id: Uuid) -> Option<BlogPost> {
        self.blog_posts.read().await.get(&id).cloned()
    }

    pub async fn get_blog_post_by_slug(&self, slug: &str) -> Option<BlogPost> {
        self.blog_posts
            .read()
            .await
            .values()
            .find(|p| p.slug == slug)
            .cloned()
    }

    /// All posts, newest first. Drafts are only visible to the admin view.
    pub async fn all_blog_posts(&self, include_unpublished: bool) -> Vec<BlogPost> {
        let mut posts: Vec<BlogPost> = self
            .blog_posts
            .read()
            .await
            .values()
            .filter(|p| include_unpublished || p.status == PostStatus::Published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    pub async fn update_blog_post(
        &self,
        id: Uuid,
        updates: BlogPostUpdate,
    ) -> StoreResult<BlogPost> {
        let mut posts = self.blog_posts.write().await;
        let post = posts
            .get_mut(&id)
            .ok_or(StoreError::NotFound("Blog post"))?;

        if let Some(title) = updates.title {
            post.title = title;
        }
        if let Some(slug) = updates.slug {
            post.slug = slug;
        }
        if let Some(excerpt) = updates.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(content) = updates.content {
            post.content = content;
        }
        if let Some(featured_image) = updates.featured_image {
            post.featured_image = Some(featured_image);
        }
        if let Some(category) = updates.category {
            post.category = Some(category);
        }
        if let Some(tags) = updates.tags {
            post.tags = tags;
        }
        if let Some(status) = updates.status {
            // published_at latches on the first transition to published and
            // survives later edits, including a move back to draft.
            if status == PostStatus::Published && post.published_at.is_none() {
                post.published_at = Some(Utc::now());
            }
            post.status = status;
        }
        if let Some(meta_title) = updates.meta_title {
            post.meta_title = Some(meta_title);
        }
        if let Some(meta_description) = updates.meta_description {
            post.meta_description = Some(meta_description);
        }
        post.updated_at = Utc::now();

        Ok(post.clone())
    }

    pub async fn delete_blog_post(&self, id: Uuid) {
        self.blog_posts.write().await.remove(&id);
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub async fn insert_project(&self, new: NewProject) -> Project {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            category: new.category,
            image: new.image,
            link: new.link,
            technologies: new.technologies,
            order: new.order.unwrap_or(0),
            featured: new.featured.unwrap_or(false),
            active: new.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        project
    }

    pub async fn get_project(&self, id: Uuid) -> Option<Project> {
        self.projects.read().await.get(&id).cloned()
    }

    /// Projects ordered ascending by `order`; inactive ones only on request.
    pub async fn all_projects(&self, include_inactive: bool) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .await
            .values()
            .filter(|p| include_inactive || p.active)
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.order);
        projects
    }

    pub async fn update_project(&self, id: Uuid, updates: ProjectUpdate) -> StoreResult<Project> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&id)
            .ok_or(StoreError::NotFound("Project"))?;

        if let Some(title) = updates.title {
            project.title = title;
        }
        if let Some(description) = updates.description {
            project.description = description;
        }
        if let Some(category) = updates.category {
            project.category = category;
        }
        if let Some(image) = updates.image {
            project.image = image;
        }
        if let Some(link) = updates.link {
            project.link = Some(link);
        }
        if let Some(technologies) = updates.technologies {
            project.technologies = Some(technologies);
        }
        if let Some(order) = updates.order {
            project.order = order;
        }
        if let Some(featured) = updates.featured {
            project.featured = featured;
        }
        if let Some(active) = updates.active {
            project.active = active;
        }
        project.updated_at = Utc::now();

        Ok(project.clone())
    }

    pub async fn delete_project(&self, id: Uuid) {
        self.projects.write().await.remove(&id);
    }

    // ========================================================================
    // AI agents
    // ========================================================================

    pub async fn insert_ai_agent(&self, new: NewAiAgent) -> AiAgent {
        let now = Utc::now();
        let agent = AiAgent {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            icon: new.icon,
            features: new.features.unwrap_or_default(),
            price: new.price,
            price_type: new.price_type.unwrap_or(PriceType::Monthly),
            category: new.category,
            capabilities: new.capabilities,
            integrations: new.integrations.unwrap_or_default(),
            order: new.order.unwrap_or(0),
            featured: new.featured.unwrap_or(false),
            active: new.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.ai_agents
            .write()
            .await
            .insert(agent.id, agent.clone());
        agent
    }

    pub async fn get_ai_agent(&self, id: Uuid) -> Option<AiAgent> {
        self.ai_agents.read().await.get(&id).cloned()
    }

    pub async fn all_ai_agents(&self, include_inactive: bool) -> Vec<AiAgent> {
        let mut agents: Vec<AiAgent> = self
            .ai_agents
            .read()
            .await
            .values()
            .filter(|a| include_inactive || a.active)
            .cloned()
            .collect();
        agents.sort_by_key(|a| a.order);
        agents
    }

    pub async fn update_ai_agent(&self, id: Uuid, updates: AiAgentUpdate) -> StoreResult<AiAgent> {
        let mut agents = self.ai_agents.write().await;
        let agent = agents
            .get_mut(&id)
            .ok_or(StoreError::NotFound("AI agent"))?;

        if let Some(name) = updates.name {
            agent.name = name;
        }
        if let Some(description) = updates.description {
            agent.description = description;
        }
        if let Some(icon) = updates.icon {
            agent.icon = icon;
        }
        if let Some(features) = updates.features {
            agent.features = features;
        }
        if let Some(price) = updates.price {
            agent.price = price;
        }
        if let Some(price_type) = updates.price_type {
            agent.price_type = price_type;
        }
        if let Some(category) = updates.category {
            agent.category = category;
        }
        if let Some(capabilities) = updates.capabilities {
            agent.capabilities = Some(capabilities);
        }
        if let Some(integrations) = updates.integrations {
            agent.integrations = integrations;
        }
        if let Some(order) = updates.order {
            agent.order = order;
        }
        if let Some(featured) = updates.featured {
            agent.featured = featured;
        }
        if let Some(active) = updates.active {
            agent.active = active;
        }
        agent.updated_at = Utc::now();

        Ok(agent.clone())
    }

    pub async fn delete_ai_agent(&self, id: Uuid) {
        self.ai_agents.write().await.remove(&id);
    }

    // ========================================================================
    // Services
    // ========================================================================

    pub async fn insert_service(&self, new: NewService) -> Service {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            icon: new.icon,
            price: new.price,
            order: new.order.unwrap_or(0),
            active: new.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.services
            .write()
            .await
            .insert(service.id, service.clone());
        service
    }

    pub async fn get_service(&self, id: Uuid) -> Option<Service> {
        self.services.read().await.get(&id).cloned()
    }

    pub async fn all_services(&self, include_inactive: bool) -> Vec<Service> {
        let mut services: Vec<Service> = self
            .services
            .read()
            .await
            .values()
            .filter(|s| include_inactive || s.active)
            .cloned()
            .collect();
        services.sort_by_key(|s| s.order);
        services
    }

    pub async fn update_service(&self, id: Uuid, updates: ServiceUpdate) -> StoreResult<Service> {
        let mut services = self.services.write().await;
        let service = services
            .get_mut(&id)
            .ok_or(StoreError::NotFound("Service"))?;

        if let Some(title) = updates.title {
            service.title = title;
        }
        if let Some(description) = updates.description {
            service.description = description;
        }
        if let Some(icon) = updates.icon {
            service.icon = icon;
        }
        if let Some(price) = updates.price {
            service.price = price;
        }
        if let Some(order) = updates.order {
            service.order = order;
        }
        if let Some(active) = updates.active {
            service.active = active;
        }
        service.updated_at = Utc::now();

        Ok(service.clone())
    }

    pub async fn delete_service(&self, id: Uuid) {
        self.services.write().await.remove(&id);
    }

    // ========================================================================
    // Testimonials
    // ========================================================================

    pub async fn insert_testimonial(&self, new: NewTestimonial) -> Testimonial {
        let testimonial = Testimonial {
            id: Uuid::new_v4(),
            name: new.name,
            role: new.role,
            company: new.company,
            quote: new.quote,
            image: new.image,
            rating: new.rating.unwrap_or(5),
            order: new.order.unwrap_or(0),
            active: new.active.unwrap_or(true),
            created_at: Utc::now(),
        };
        self.testimonials
            .write()
            .await
            .insert(testimonial.id, testimonial.clone());
        testimonial
    }

    pub async fn get_testimonial(&self, id: Uuid) -> Option<Testimonial> {
        self.testimonials.read().await.get(&id).cloned()
    }

    pub async fn all_testimonials(&self, include_inactive: bool) -> Vec<Testimonial> {
        let mut testimonials: Vec<Testimonial> = self
            .testimonials
            .read()
            .await
            .values()
            .filter(|t| include_inactive || t.active)
            .cloned()
            .collect();
        testimonials.sort_by_key(|t| t.order);
        testimonials
    }

    pub async fn update_testimonial(
        &self,
        id: Uuid,
        updates: TestimonialUpdate,
    ) -> StoreResult<Testimonial> {
        let mut testimonials = self.testimonials.write().await;
        let testimonial = testimonials
            .get_mut(&id)
            .ok_or(StoreError::NotFound("Testimonial"))?;

        if let Some(name) = updates.name {
            testimonial.name = name;
        }
        if let Some(role) = updates.role {
            testimonial.role = role;
        }
        if let Some(company) = updates.company {
            testimonial.company = Some(company);
        }
        if let Some(quote) = updates.quote {
            testimonial.quote = quote;
        }
        if let Some(image) = updates.image {
            testimonial.image = image;
        }
        if let Some(rating) = updates.rating {
            testimonial.rating = rating;
        }
        if let Some(order) = updates.order {
            testimonial.order = order;
        }
        if let Some(active) = updates.active {
            testimonial.active = active;
        }

        Ok(testimonial.clone())
    }

    pub async fn delete_testimonial(&self, id: Uuid) {
        self.testimonials.write().await.remove(&id);
    }

    // ========================================================================
    // Site settings
    // ========================================================================

    pub async fn get_setting(&self, key: &str) -> Option<SiteSetting> {
        self.settings.read().await.get(key).cloned()
    }

    pub async fn all_settings(&self) -> Vec<SiteSetting> {
        self.settings.read().await.values().cloned().collect()
    }

    /// Upsert addressed by key: the first write for a key assigns a fresh
    /// id, later writes update value and timestamp in place, keeping the id.
    pub async fn set_setting(&self, key: &str, value: Value) -> SiteSetting {
        let mut settings = self.settings.write().await;
        match settings.get_mut(key) {
            Some(existing) => {
                existing.value = value;
                existing.updated_at = Utc::now();
                existing.clone()
            }
            None => {
                let setting = SiteSetting {
                    id: Uuid::new_v4(),
                    key: key.to_string(),
                    value,
                    updated_at: Utc::now(),
                };
                settings.insert(key.to_string(), setting.clone());
                setting
            }
        }
    }
}
