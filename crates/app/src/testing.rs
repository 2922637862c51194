//! In-memory backend for view model tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use skillzone_core::{
    ClientConfig, Experience, ExperienceDraft, LikeState, ProfileUpdate, Session, SessionManager,
    SignupForm, Skill, SkillDraft, TopSkill, UserProfile, UserSummary, DEFAULT_PROFILE_IMAGE,
};
use skillzone_net::{Error, Result, SkillzoneApi};
use tokio::sync::{mpsc, Notify};

use crate::events::{EventBus, SyncEvent};
use crate::state::AppState;

pub const USER_CREDENTIAL: &str = "YWRhQGV4YW1wbGUuY29tOnNlY3JldA==";

pub fn skill(id: &str, title: &str, likes: u32, has_liked: bool) -> Skill {
    Skill {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("About {}", title),
        tool: None,
        image: None,
        profile_image: DEFAULT_PROFILE_IMAGE.to_string(),
        username: Some("ada".to_string()),
        email: Some("ada@example.com".to_string()),
        likes,
        has_liked,
        created_at: skillzone_core::created_at_from_id(id),
    }
}

/// A request that parks until the test lets it through
#[derive(Debug, Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub skills: Mutex<Vec<Skill>>,
    pub own_skills: Mutex<Vec<Skill>>,
    pub top_skills: Mutex<Vec<TopSkill>>,
    pub users: Mutex<Vec<UserSummary>>,
    pub experiences: Mutex<Vec<Experience>>,
    pub profiles: Mutex<HashMap<String, UserProfile>>,
    pub profile: Mutex<Option<UserProfile>>,
    pub search_results: Mutex<HashMap<String, Vec<Skill>>>,
    pub search_gates: Mutex<HashMap<String, Arc<Gate>>>,
    pub like_gate: Mutex<Option<Arc<Gate>>>,
    /// Server answer to a like toggle; `None` echoes the flipped stored state
    pub like_answer: Mutex<Option<LikeState>>,
    /// Operation name -> status code it fails with
    pub failures: Mutex<HashMap<&'static str, u16>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, op: &'static str, status: u16) {
        self.failures.lock().unwrap().insert(op, status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(':').next() == Some(op))
            .count()
    }

    fn record(&self, op: &'static str, arg: &str) -> Result<()> {
        self.calls.lock().unwrap().push(format!("{}:{}", op, arg));
        match self.failures.lock().unwrap().get(op) {
            Some(&status) => Err(Error::Remote {
                status,
                body: format!("{} failed", op),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SkillzoneApi for FakeApi {
    async fn signup(&self, form: &SignupForm) -> Result<()> {
        self.record("signup", &form.email)
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        self.record("login", email)?;
        Ok(Session::from_login(email, password))
    }

    async fn list_skills(&self, _session: &Session) -> Result<Vec<Skill>> {
        self.record("list_skills", "")?;
        Ok(self.skills.lock().unwrap().clone())
    }

    async fn list_own_skills(&self, _session: &Session) -> Result<Vec<Skill>> {
        self.record("list_own_skills", "")?;
        Ok(self.own_skills.lock().unwrap().clone())
    }

    async fn get_skill(&self, _session: &Session, id: &str) -> Result<Skill> {
        self.record("get_skill", id)?;
        self.own_skills
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::Remote {
                status: 404,
                body: "Skill not found".to_string(),
            })
    }

    async fn search_skills(&self, _session: &Session, query: &str) -> Result<Vec<Skill>> {
        self.record("search_skills", query)?;
        let gate = self.search_gates.lock().unwrap().get(query).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        Ok(self
            .search_results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn toggle_like(&self, _session: &Session, id: &str) -> Result<LikeState> {
        let gate = self.like_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.record("toggle_like", id)?;

        if let Some(answer) = *self.like_answer.lock().unwrap() {
            return Ok(answer);
        }
        let mut skills = self.skills.lock().unwrap();
        let stored = skills
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::Remote {
                status: 404,
                body: "Skill not found".to_string(),
            })?;
        let next = stored.like_state().toggled();
        stored.set_like_state(next);
        Ok(next)
    }

    async fn save_skill(&self, _session: &Session, draft: &SkillDraft) -> Result<()> {
        self.record("save_skill", draft.id.as_deref().unwrap_or("new"))?;
        let mut own = self.own_skills.lock().unwrap();
        match &draft.id {
            Some(id) => {
                if let Some(existing) = own.iter_mut().find(|s| &s.id == id) {
                    existing.title = draft.title.clone();
                    existing.description = draft.description.clone();
                }
            }
            None => {
                let id = format!("{:024x}", own.len() + 1);
                let mut created = skill(&id, &draft.title, 0, false);
                created.description = draft.description.clone();
                own.push(created);
            }
        }
        Ok(())
    }

    async fn delete_skill(&self, _session: &Session, id: &str) -> Result<()> {
        self.record("delete_skill", id)?;
        self.own_skills.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }

    async fn list_top_skills(&self) -> Result<Vec<TopSkill>> {
        self.record("list_top_skills", "")?;
        Ok(self.top_skills.lock().unwrap().clone())
    }

    async fn create_top_skill(&self, name: &str) -> Result<()> {
        self.record("create_top_skill", name)?;
        self.top_skills.lock().unwrap().push(TopSkill::new(name));
        Ok(())
    }

    async fn delete_top_skill(&self, name: &str) -> Result<()> {
        self.record("delete_top_skill", name)?;
        self.top_skills.lock().unwrap().retain(|s| s.name != name);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>> {
        self.record("list_users", "")?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get_user_details(&self, name: &str) -> Result<UserSummary> {
        self.record("get_user_details", name)?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.name == name)
            .cloned()
            .ok_or_else(|| Error::Remote {
                status: 404,
                body: "User not found".to_string(),
            })
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        self.record("delete_user", id)?;
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }

    async fn get_profile(&self, _session: &Session) -> Result<UserProfile> {
        self.record("get_profile", "")?;
        self.profile.lock().unwrap().clone().ok_or_else(|| Error::Remote {
            status: 404,
            body: "no profile".to_string(),
        })
    }

    async fn get_user_profile(&self, _session: &Session, username: &str) -> Result<UserProfile> {
        self.record("get_user_profile", username)?;
        self.profiles
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(|| Error::Remote {
                status: 404,
                body: String::new(),
            })
    }

    async fn update_profile(&self, _session: &Session, update: &ProfileUpdate) -> Result<()> {
        self.record("update_profile", &update.email)?;
        let mut profile = self.profile.lock().unwrap();
        let current = profile.get_or_insert_with(UserProfile::default);
        current.name = update.name.clone();
        current.email = update.email.clone();
        current.college_branch = Some(update.college_branch.clone());
        current.bio = update.bio.clone();
        Ok(())
    }

    async fn list_experiences(&self, _session: &Session) -> Result<Vec<Experience>> {
        self.record("list_experiences", "")?;
        Ok(self.experiences.lock().unwrap().clone())
    }

    async fn list_user_experiences(&self, _session: &Session, email: &str) -> Result<Vec<Experience>> {
        self.record("list_user_experiences", email)?;
        Ok(self.experiences.lock().unwrap().clone())
    }

    async fn create_experience(&self, _session: &Session, draft: &ExperienceDraft) -> Result<()> {
        self.record("create_experience", &draft.text)?;
        let mut experiences = self.experiences.lock().unwrap();
        let id = format!("e{}", experiences.len() + 1);
        experiences.push(Experience {
            id,
            text: draft.text.clone(),
            image: None,
        });
        Ok(())
    }

    async fn delete_experience(&self, _session: &Session, id: &str) -> Result<()> {
        self.record("delete_experience", id)?;
        self.experiences.lock().unwrap().retain(|e| e.id != id);
        Ok(())
    }
}

/// App state over a fake backend with a signed-in user
pub fn harness(api: Arc<FakeApi>) -> (Arc<AppState>, mpsc::UnboundedReceiver<SyncEvent>) {
    harness_with(api, USER_CREDENTIAL, ClientConfig::default())
}

pub fn harness_with(
    api: Arc<FakeApi>,
    credential: &str,
    config: ClientConfig,
) -> (Arc<AppState>, mpsc::UnboundedReceiver<SyncEvent>) {
    let session = Arc::new(SessionManager::in_memory());
    if !credential.is_empty() {
        session.set_session(credential);
    }
    let (events, rx) = EventBus::channel();
    (Arc::new(AppState::new(api, session, events, config)), rx)
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<SyncEvent>) -> Vec<SyncEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Fixed answers for the confirmation gate
pub struct Answer(pub bool);

impl crate::confirm::Confirm for Answer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
