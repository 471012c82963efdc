//! In-memory repository fakes for service tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use kanbon_common::auth::JwtService;
use kanbon_core::entities::{
    Account, Field, Form, MembershipRole, Organization, SystemMessage, DEFAULT_UTYPE,
};
use kanbon_core::error::DomainError;
use kanbon_core::traits::{
    AccountRepository, FieldRepository, FormRepository, OrganizationRepository, RepoResult,
    SystemMessageRepository,
};
use kanbon_core::value_objects::{AddressKind, Snowflake, SnowflakeGenerator};

use crate::services::mailer::{Mailer, OutgoingMail};
use crate::services::{ServiceContext, ServiceResult};

// ============================================================================
// Accounts
// ============================================================================

#[derive(Default)]
pub struct InMemoryAccounts {
    rows: Mutex<HashMap<Snowflake, (Account, String)>>,
}

impl InMemoryAccounts {
    pub fn get(&self, id: Snowflake) -> Account {
        self.rows.lock().unwrap()[&id].0.clone()
    }

    pub fn put(&self, account: Account) {
        let mut rows = self.rows.lock().unwrap();
        let hash = rows
            .get(&account.id)
            .map(|(_, hash)| hash.clone())
            .unwrap_or_default();
        rows.insert(account.id, (account, hash));
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>> {
        Ok(self.rows.lock().unwrap().get(&id).map(|(a, _)| a.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .map(|(a, _)| a)
            .filter(|a| a.email_address.as_deref() == Some(email))
            .min_by_key(|a| a.id)
            .cloned())
    }

    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|(a, _)| a.username == account.username) {
            return Err(DomainError::UsernameTaken);
        }
        rows.insert(account.id, (account.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn update(&self, account: &Account) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&account.id) {
            Some(row) => {
                row.0 = account.clone();
                Ok(())
            }
            None => Err(DomainError::AccountNotFound(account.id)),
        }
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.rows.lock().unwrap().get(&id).map(|(_, h)| h.clone()))
    }

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(&id).ok_or(DomainError::AccountNotFound(id))?;
        row.1 = password_hash.to_string();
        Ok(())
    }

    async fn release_pending_address(
        &self,
        kind: AddressKind,
        address: &str,
        claimant_id: Snowflake,
    ) -> RepoResult<Vec<Snowflake>> {
        let mut rows = self.rows.lock().unwrap();
        let mut released = Vec::new();
        for (account, _) in rows.values_mut() {
            if account.id == claimant_id {
                continue;
            }
            match kind {
                AddressKind::Email => {
                    if account.pending_email() == Some(address) && account.email_address.is_some() {
                        account.email_state = kanbon_core::EmailState::Verified;
                        released.push(account.id);
                    }
                }
                AddressKind::Phone => {
                    if account.pending_phone_number.as_deref() == Some(address)
                        && account.phone_number.is_some()
                    {
                        account.pending_phone_number = None;
                        released.push(account.id);
                    }
                }
            }
        }
        released.sort();
        Ok(released)
    }
}

// ============================================================================
// System messages
// ============================================================================

#[derive(Default)]
pub struct InMemorySystemMessages {
    rows: Mutex<Vec<SystemMessage>>,
}

impl InMemorySystemMessages {
    pub fn for_account(&self, account_id: Snowflake) -> Vec<SystemMessage> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.account_id == account_id)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SystemMessageRepository for InMemorySystemMessages {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<SystemMessage>> {
        Ok(self.rows.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_account(&self, account_id: Snowflake) -> RepoResult<Vec<SystemMessage>> {
        let mut messages = self.for_account(account_id);
        messages.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(messages)
    }

    async fn create(&self, message: &SystemMessage) -> RepoResult<()> {
        self.rows.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn update(&self, message: &SystemMessage) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|m| m.id == message.id)
            .ok_or(DomainError::SystemMessageNotFound(message.id))?;
        *row = message.clone();
        Ok(())
    }
}

// ============================================================================
// Organizations
// ============================================================================

#[derive(Default)]
pub struct InMemoryOrganizations {
    orgs: Mutex<HashMap<Snowflake, Organization>>,
    memberships: Mutex<HashMap<(Snowflake, Snowflake), MembershipRole>>,
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizations {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Organization>> {
        Ok(self.orgs.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, organization: &Organization) -> RepoResult<()> {
        self.orgs
            .lock()
            .unwrap()
            .insert(organization.id, organization.clone());
        Ok(())
    }

    async fn set_membership(
        &self,
        organization_id: Snowflake,
        account_id: Snowflake,
        role: MembershipRole,
    ) -> RepoResult<()> {
        self.memberships
            .lock()
            .unwrap()
            .insert((organization_id, account_id), role);
        Ok(())
    }

    async fn membership_role(
        &self,
        organization_id: Snowflake,
        account_id: Snowflake,
    ) -> RepoResult<Option<MembershipRole>> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .get(&(organization_id, account_id))
            .copied())
    }
}

// ============================================================================
// Forms and fields
// ============================================================================

#[derive(Default)]
pub struct InMemoryForms {
    rows: Mutex<HashMap<Snowflake, Form>>,
}

impl InMemoryForms {
    pub fn get(&self, id: Snowflake) -> Form {
        self.rows.lock().unwrap()[&id].clone()
    }

    fn live_name_taken(rows: &HashMap<Snowflake, Form>, form: &Form) -> bool {
        rows.values().any(|f| {
            f.id != form.id
                && !f.is_deleted()
                && f.organization_id == form.organization_id
                && f.name == form.name
        })
    }
}

#[async_trait]
impl FormRepository for InMemoryForms {
    async fn find_in_organization(
        &self,
        organization_id: Snowflake,
        form_id: Snowflake,
    ) -> RepoResult<Option<Form>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&form_id)
            .filter(|f| f.organization_id == Some(organization_id) && !f.is_deleted())
            .cloned())
    }

    async fn find_by_organization(&self, organization_id: Snowflake) -> RepoResult<Vec<Form>> {
        let mut forms: Vec<Form> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.organization_id == Some(organization_id) && !f.is_deleted())
            .cloned()
            .collect();
        forms.sort_by_key(|f| (f.created_at, f.id));
        Ok(forms)
    }

    async fn name_exists(
        &self,
        organization_id: Snowflake,
        name: &str,
        exclude: Option<Snowflake>,
    ) -> RepoResult<bool> {
        Ok(self.rows.lock().unwrap().values().any(|f| {
            f.organization_id == Some(organization_id)
                && f.name == name
                && !f.is_deleted()
                && Some(f.id) != exclude
        }))
    }

    async fn create(&self, form: &Form) -> RepoResult<()> {
        form.ensure_persistable()?;
        let mut rows = self.rows.lock().unwrap();
        if Self::live_name_taken(&rows, form) {
            return Err(DomainError::FormNameExists);
        }
        rows.insert(form.id, form.clone());
        Ok(())
    }

    async fn update(&self, form: &Form) -> RepoResult<()> {
        form.ensure_persistable()?;
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&form.id) {
            return Err(DomainError::FormNotFound);
        }
        if !form.is_deleted() && Self::live_name_taken(&rows, form) {
            return Err(DomainError::FormNameExists);
        }
        rows.insert(form.id, form.clone());
        Ok(())
    }
}

pub struct InMemoryFields {
    forms: Arc<InMemoryForms>,
    rows: Mutex<HashMap<Snowflake, Field>>,
}

impl InMemoryFields {
    pub fn new(forms: Arc<InMemoryForms>) -> Self {
        Self {
            forms,
            rows: Mutex::default(),
        }
    }

    pub fn get(&self, id: Snowflake) -> Field {
        self.rows.lock().unwrap()[&id].clone()
    }
}

#[async_trait]
impl FieldRepository for InMemoryFields {
    async fn find_in_organization(
        &self,
        organization_id: Snowflake,
        field_id: Snowflake,
    ) -> RepoResult<Option<Field>> {
        let Some(field) = self.rows.lock().unwrap().get(&field_id).cloned() else {
            return Ok(None);
        };
        let form = self
            .forms
            .find_in_organization(organization_id, field.form_id)
            .await?;
        Ok(form.filter(|_| !field.is_deleted()).map(|_| field))
    }

    async fn find_by_form(&self, form_id: Snowflake) -> RepoResult<Vec<Field>> {
        let mut fields: Vec<Field> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.form_id == form_id && !f.is_deleted())
            .cloned()
            .collect();
        fields.sort_by_key(|f| (f.created_at, f.id));
        Ok(fields)
    }

    async fn create(&self, field: &Field) -> RepoResult<()> {
        self.rows.lock().unwrap().insert(field.id, field.clone());
        Ok(())
    }

    async fn update(&self, field: &Field) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&field.id) {
            return Err(DomainError::FieldNotFound);
        }
        rows.insert(field.id, field.clone());
        Ok(())
    }
}

// ============================================================================
// Mailer
// ============================================================================

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Plain token of the most recent delivery
    pub fn last_token(&self) -> String {
        self.sent.lock().unwrap().last().unwrap().token.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> ServiceResult<()> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

// ============================================================================
// Context
// ============================================================================

pub struct Fakes {
    pub accounts: Arc<InMemoryAccounts>,
    pub messages: Arc<InMemorySystemMessages>,
    pub organizations: Arc<InMemoryOrganizations>,
    pub forms: Arc<InMemoryForms>,
    pub fields: Arc<InMemoryFields>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn test_context() -> (ServiceContext, Fakes) {
    let forms = Arc::new(InMemoryForms::default());
    let fakes = Fakes {
        accounts: Arc::new(InMemoryAccounts::default()),
        messages: Arc::new(InMemorySystemMessages::default()),
        organizations: Arc::new(InMemoryOrganizations::default()),
        fields: Arc::new(InMemoryFields::new(forms.clone())),
        forms,
        mailer: Arc::new(RecordingMailer::default()),
    };

    let ctx = ServiceContext::builder()
        .account_repo(fakes.accounts.clone())
        .system_message_repo(fakes.messages.clone())
        .organization_repo(fakes.organizations.clone())
        .form_repo(fakes.forms.clone())
        .field_repo(fakes.fields.clone())
        .jwt_service(Arc::new(JwtService::new("test-secret", 900, 604_800)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .mailer(fakes.mailer.clone())
        .build()
        .unwrap();

    (ctx, fakes)
}

/// Store an account directly, bypassing registration
pub async fn seed_account(fakes: &Fakes, id: i64, email: Option<&str>) -> Account {
    let account = Account::new(
        Snowflake::new(id),
        None,
        email.map(String::from),
        DEFAULT_UTYPE,
    )
    .unwrap();
    fakes.accounts.create(&account, "unused").await.unwrap();
    account
}

/// Organization with one admin and one plain member
pub async fn seed_organization(fakes: &Fakes, admin: Snowflake, member: Snowflake) -> Snowflake {
    let org = Organization::new(Snowflake::new(500), "Acme".to_string());
    fakes.organizations.create(&org).await.unwrap();
    fakes
        .organizations
        .set_membership(org.id, admin, MembershipRole::Admin)
        .await
        .unwrap();
    fakes
        .organizations
        .set_membership(org.id, member, MembershipRole::Member)
        .await
        .unwrap();
    org.id
}
