//! HTTP client for the Skillzone REST API

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use skillzone_core::{
    Experience, ExperienceDraft, LikeState, ProfileUpdate, Session, SignupForm, Skill, SkillDraft,
    TopSkill, Upload, UserProfile, UserSummary,
};
use tracing::{debug, warn};

use crate::api::SkillzoneApi;
use crate::endpoints;
use crate::error::{Error, Result};
use crate::wire::{ExperienceDto, LikeDto, LoginRequest, SkillDto, TopSkillDto, UserDto};

/// Client for one API base URL.
///
/// Every call issues exactly one request. There is no retry and no
/// client-side timeout beyond what the transport applies.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base: Url,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("skillzone/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Join path segments (percent-encoded) onto the base URL
    fn url(&self, path: &[&str], tail: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(path)
            .extend(tail);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, session: Option<&Session>) -> RequestBuilder {
        debug!(method = %method, url = %url, "API request");
        let builder = self.http.request(method, url);
        match session {
            Some(session) => builder.header(AUTHORIZATION, session.authorization_header()),
            None => builder,
        }
    }

    /// Send and turn any non-success status into [`Error::Remote`]
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "API request failed");
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_list<D, T>(&self, url: Url, session: Option<&Session>) -> Result<Vec<T>>
    where
        D: DeserializeOwned,
        T: From<D>,
    {
        let items: Vec<D> = self.json(self.request(Method::GET, url, session)).await?;
        Ok(items.into_iter().map(T::from).collect())
    }
}

fn file_part(upload: &Upload) -> Result<Part> {
    Ok(Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.mime)?)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn skill_form(draft: &SkillDraft) -> Result<Form> {
    let mut form = Form::new()
        .text("title", draft.title.clone())
        .text("description", draft.description.clone())
        .text("likes", "0");
    if let Some(tool) = non_blank(draft.tool.as_deref()) {
        form = form.text("tool", tool.to_string());
    }
    if let Some(image) = &draft.image {
        form = form.part("file", file_part(image)?);
    }
    Ok(form)
}

fn profile_form(update: &ProfileUpdate) -> Result<Form> {
    let mut form = Form::new()
        .text("name", update.name.clone())
        .text("email", update.email.clone())
        .text("branch", update.college_branch.clone());
    if let Some(password) = non_blank(update.password.as_deref()) {
        form = form.text("password", password.to_string());
    }
    if let Some(image) = &update.image {
        form = form.part("image", file_part(image)?);
    }
    if let Some(bio) = non_blank(update.bio.as_deref()) {
        form = form.text("bio", bio.to_string());
    }
    Ok(form)
}

fn signup_form(signup: &SignupForm) -> Result<Form> {
    let mut form = Form::new()
        .text("name", signup.name.clone())
        .text("email", signup.email.clone())
        .text("password", signup.password.clone());
    if let Some(branch) = non_blank(signup.college_branch.as_deref()) {
        form = form.text("collegeBranch", branch.to_string());
    }
    if let Some(bio) = non_blank(signup.bio.as_deref()) {
        form = form.text("bio", bio.to_string());
    }
    if let Some(image) = &signup.image {
        form = form.part("image", file_part(image)?);
    }
    Ok(form)
}

#[async_trait]
impl SkillzoneApi for HttpClient {
    async fn signup(&self, form: &SignupForm) -> Result<()> {
        form.validate()?;
        let url = self.url(endpoints::SIGNUP, &[])?;
        let builder = self.request(Method::POST, url, None).multipart(signup_form(form)?);
        self.send(builder).await?;
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.url(endpoints::LOGIN, &[])?;
        let builder = self
            .request(Method::POST, url, None)
            .json(&LoginRequest { email, password });
        self.send(builder).await?;
        Ok(Session::from_login(email, password))
    }

    async fn list_skills(&self, session: &Session) -> Result<Vec<Skill>> {
        let url = self.url(endpoints::ALL_SKILLS, &[])?;
        self.get_list::<SkillDto, _>(url, Some(session)).await
    }

    async fn list_own_skills(&self, session: &Session) -> Result<Vec<Skill>> {
        let url = self.url(endpoints::OWN_SKILLS, &[])?;
        self.get_list::<SkillDto, _>(url, Some(session)).await
    }

    async fn get_skill(&self, session: &Session, id: &str) -> Result<Skill> {
        let url = self.url(endpoints::SKILLS, &[id])?;
        let dto: SkillDto = self
            .json(self.request(Method::GET, url, Some(session)))
            .await?;
        Ok(dto.into())
    }

    async fn search_skills(&self, session: &Session, query: &str) -> Result<Vec<Skill>> {
        let mut url = self.url(endpoints::SKILL_SEARCH, &[])?;
        url.query_pairs_mut().append_pair("query", query);
        self.get_list::<SkillDto, _>(url, Some(session)).await
    }

    async fn toggle_like(&self, session: &Session, id: &str) -> Result<LikeState> {
        let url = self.url(endpoints::SKILL_LIKE, &[id])?;
        let dto: LikeDto = self
            .json(self.request(Method::PUT, url, Some(session)))
            .await?;
        Ok(dto.into())
    }

    async fn save_skill(&self, session: &Session, draft: &SkillDraft) -> Result<()> {
        draft.validate()?;
        let (method, url) = match &draft.id {
            Some(id) => (Method::PUT, self.url(endpoints::SKILL_UPDATE, &[id.as_str()])?),
            None => (Method::POST, self.url(endpoints::SKILL_CREATE, &[])?),
        };
        let builder = self
            .request(method, url, Some(session))
            .multipart(skill_form(draft)?);
        self.send(builder).await?;
        Ok(())
    }

    async fn delete_skill(&self, session: &Session, id: &str) -> Result<()> {
        let url = self.url(endpoints::SKILL_DELETE, &[id])?;
        self.send(self.request(Method::DELETE, url, Some(session)))
            .await?;
        Ok(())
    }

    async fn list_top_skills(&self) -> Result<Vec<TopSkill>> {
        let url = self.url(endpoints::TOP_SKILLS, &[])?;
        self.get_list::<TopSkillDto, _>(url, None).await
    }

    async fn create_top_skill(&self, name: &str) -> Result<()> {
        let url = self.url(endpoints::TOP_SKILL_CREATE, &[])?;
        let form = Form::new().text("skillName", name.to_string());
        self.send(self.request(Method::POST, url, None).multipart(form))
            .await?;
        Ok(())
    }

    async fn delete_top_skill(&self, name: &str) -> Result<()> {
        let mut url = self.url(endpoints::TOP_SKILL_DELETE, &[])?;
        url.query_pairs_mut().append_pair("skillName", name);
        self.send(self.request(Method::DELETE, url, None)).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>> {
        let url = self.url(endpoints::ALL_USERS, &[])?;
        self.get_list::<UserDto, _>(url, None).await
    }

    async fn get_user_details(&self, name: &str) -> Result<UserSummary> {
        let url = self.url(endpoints::ADMIN_USER_PROFILE, &[name])?;
        let dto: UserDto = self.json(self.request(Method::GET, url, None)).await?;
        Ok(dto.into())
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        let url = self.url(endpoints::ADMIN_USER_DELETE, &[id])?;
        self.send(self.request(Method::DELETE, url, None)).await?;
        Ok(())
    }

    async fn get_profile(&self, session: &Session) -> Result<UserProfile> {
        let url = self.url(endpoints::PROFILE, &[])?;
        let dto: UserDto = self
            .json(self.request(Method::GET, url, Some(session)))
            .await?;
        Ok(dto.into())
    }

    async fn get_user_profile(&self, session: &Session, username: &str) -> Result<UserProfile> {
        let url = self.url(endpoints::PROFILE, &[username])?;
        let dto: UserDto = self
            .json(self.request(Method::GET, url, Some(session)))
            .await?;
        Ok(dto.into())
    }

    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<()> {
        update.validate()?;
        let url = self.url(endpoints::PROFILE_UPDATE, &[])?;
        let builder = self
            .request(Method::POST, url, Some(session))
            .multipart(profile_form(update)?);
        self.send(builder).await?;
        Ok(())
    }

    async fn list_experiences(&self, session: &Session) -> Result<Vec<Experience>> {
        let url = self.url(endpoints::OWN_EXPERIENCES, &[])?;
        self.get_list::<ExperienceDto, _>(url, Some(session)).await
    }

    async fn list_user_experiences(&self, session: &Session, email: &str) -> Result<Vec<Experience>> {
        let url = self.url(endpoints::USER_EXPERIENCES, &[email])?;
        self.get_list::<ExperienceDto, _>(url, Some(session)).await
    }

    async fn create_experience(&self, session: &Session, draft: &ExperienceDraft) -> Result<()> {
        draft.validate()?;
        let url = self.url(endpoints::EXPERIENCE_CREATE, &[])?;
        let mut form = Form::new().text("experience", draft.text.clone());
        if let Some(image) = &draft.image {
            form = form.part("file", file_part(image)?);
        }
        self.send(self.request(Method::POST, url, Some(session)).multipart(form))
            .await?;
        Ok(())
    }

    async fn delete_experience(&self, session: &Session, id: &str) -> Result<()> {
        let url = self.url(endpoints::EXPERIENCE_DELETE, &[id])?;
        self.send(self.request(Method::DELETE, url, Some(session)))
            .await?;
        Ok(())
    }
}
