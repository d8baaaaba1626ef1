//! # Command Execution
//!
//! Translates one CLI command into `ClientRegistryApi` calls and renders the
//! result as JSON.

use serde_json::{json, Value};
use shared_types::{ClientId, UserId};
use sr_01_client_registry::{
    ClientFilter, ClientInput, ClientPatch, ClientRegistryApi, FieldPatch, RegistryError,
};
use thiserror::Error;
use tracing::debug;

use crate::cli::{Command, CreateArgs, ListArgs, UpdateArgs};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("An acting user is required: pass --user or set SR_ACTING_USER")]
    MissingUser,

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CommandError {
    /// Process exit code: 2 for rejections the operator can fix, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Registry(err) if err.is_recoverable() => 2,
            CommandError::MissingUser => 2,
            _ => 1,
        }
    }

    /// JSON rendering for stdout.
    pub fn to_json(&self) -> Value {
        let kind = match self {
            CommandError::Registry(err) => err.kind(),
            CommandError::MissingUser => "missing_user",
            CommandError::Encode(_) => "encode",
        };
        json!({ "error": kind, "message": self.to_string() })
    }
}

fn parse_client_id(raw: &str) -> Result<ClientId, CommandError> {
    ClientId::parse(raw.trim()).map_err(|e| RegistryError::from(e).into())
}

fn acting_user(raw: Option<&str>) -> Result<UserId, CommandError> {
    let raw = raw.ok_or(CommandError::MissingUser)?;
    UserId::new(raw).map_err(|e| RegistryError::from(e).into())
}

fn field_patch(value: Option<String>, clear: bool) -> FieldPatch<String> {
    match (value, clear) {
        (_, true) => FieldPatch::Clear,
        (Some(value), false) => FieldPatch::Set(value),
        (None, false) => FieldPatch::Keep,
    }
}

fn create_input(args: CreateArgs) -> ClientInput {
    ClientInput {
        display_name: args.name,
        legal_id: args.legal_id,
        email: args.email,
        phone: args.phone,
        address: args.address,
        contact_name: args.contact,
    }
}

fn update_patch(args: UpdateArgs) -> ClientPatch {
    ClientPatch {
        display_name: args.name,
        legal_id: args.legal_id,
        email: field_patch(args.email, args.clear_email),
        phone: field_patch(args.phone, args.clear_phone),
        address: field_patch(args.address, args.clear_address),
        contact_name: field_patch(args.contact, args.clear_contact),
    }
}

fn list_filter(args: ListArgs) -> ClientFilter {
    let active = match (args.active, args.inactive) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    };
    ClientFilter {
        active,
        name_prefix: args.prefix,
    }
}

/// Run `command` against `api`.
pub async fn execute<A>(
    api: &A,
    command: Command,
    user: Option<&str>,
) -> Result<Value, CommandError>
where
    A: ClientRegistryApi + ?Sized,
{
    debug!(?command, "Executing registry command");
    let output = match command {
        Command::Create(args) => {
            let client_id = api.create_client(create_input(args), acting_user(user)?).await?;
            json!({ "clientId": client_id })
        }
        Command::Update(args) => {
            let client_id = parse_client_id(&args.client_id)?;
            let user = acting_user(user)?;
            let client = api.update_client(client_id, update_patch(args), user).await?;
            serde_json::to_value(client)?
        }
        Command::Activate(args) => {
            let client = api
                .set_active_state(
                    parse_client_id(&args.client_id)?,
                    true,
                    args.reason,
                    acting_user(user)?,
                )
                .await?;
            serde_json::to_value(client)?
        }
        Command::Deactivate(args) => {
            let client = api
                .set_active_state(
                    parse_client_id(&args.client_id)?,
                    false,
                    args.reason,
                    acting_user(user)?,
                )
                .await?;
            serde_json::to_value(client)?
        }
        Command::Delete(args) => {
            let client_id = parse_client_id(&args.client_id)?;
            api.delete_client(client_id.clone(), args.reason, acting_user(user)?)
                .await?;
            json!({ "deleted": client_id })
        }
        Command::Show { client_id } => {
            serde_json::to_value(api.get_client(parse_client_id(&client_id)?).await?)?
        }
        Command::Find { legal_id } => serde_json::to_value(api.find_by_legal_id(legal_id).await?)?,
        Command::List(args) => serde_json::to_value(api.list_clients(list_filter(args)).await?)?,
        Command::Audit { client_id } => {
            serde_json::to_value(api.audit_trail(parse_client_id(&client_id)?).await?)?
        }
    };
    Ok(output)
}
