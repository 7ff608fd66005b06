//! GraphQL schema - query and mutation roots over the record store
//!
//! Root fields delegate to the generic CRUD entry points on [`Store`];
//! relationship fields call into [`crate::relations`] and are only
//! evaluated when a client selects them.

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Result, Schema, SimpleObject, ID};
use crate::model::{
    CreateEventInput, CreateLocationInput, CreateParticipantInput, CreateUserInput, Event,
    Location, Participant, Record, UpdateEventInput, UpdateLocationInput, UpdateParticipantInput,
    UpdateUserInput, User,
};
use crate::relations;
use crate::storage::{SharedStore, Store};

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with `store` attached as shared context data
pub fn build_schema(store: SharedStore) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

/// Schema without any data attached, for printing SDL
pub fn sdl() -> String {
    build_schema(Store::new().into_shared()).sdl()
}

impl ErrorExtensions for crate::Error {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            if self.is_not_found() {
                e.set("code", "NOT_FOUND");
            }
        })
    }
}

#[derive(Debug, Clone, Copy, SimpleObject)]
pub struct DeleteAllOutput {
    pub count: i32,
}

fn shared<'a>(ctx: &Context<'a>) -> Result<&'a SharedStore> {
    ctx.data::<SharedStore>()
}

// ========== Generic resolvers ==========

async fn fetch<R: Record>(ctx: &Context<'_>, id: &str) -> Result<R> {
    let store = shared(ctx)?.read().await;
    store.get::<R>(id).cloned().map_err(|e| e.extend())
}

async fn list<R: Record>(ctx: &Context<'_>) -> Result<Vec<R>> {
    let store = shared(ctx)?.read().await;
    Ok(store.list::<R>().to_vec())
}

async fn create<R: Record>(ctx: &Context<'_>, data: R::Create) -> Result<R> {
    let mut store = shared(ctx)?.write().await;
    Ok(store.create::<R>(data))
}

async fn update<R: Record>(ctx: &Context<'_>, id: &str, patch: R::Patch) -> Result<R> {
    let mut store = shared(ctx)?.write().await;
    store.update::<R>(id, patch).map_err(|e| e.extend())
}

async fn delete<R: Record>(ctx: &Context<'_>, id: &str) -> Result<R> {
    let mut store = shared(ctx)?.write().await;
    store.delete::<R>(id).map_err(|e| e.extend())
}

async fn delete_all<R: Record>(ctx: &Context<'_>) -> Result<DeleteAllOutput> {
    let mut store = shared(ctx)?.write().await;
    let count = store.delete_all::<R>();
    Ok(DeleteAllOutput {
        count: i32::try_from(count).unwrap_or(i32::MAX),
    })
}

// ========== Roots ==========

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<User> {
        fetch(ctx, &id).await
    }

    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        list(ctx).await
    }

    async fn event(&self, ctx: &Context<'_>, id: ID) -> Result<Event> {
        fetch(ctx, &id).await
    }

    async fn events(&self, ctx: &Context<'_>) -> Result<Vec<Event>> {
        list(ctx).await
    }

    async fn location(&self, ctx: &Context<'_>, id: ID) -> Result<Location> {
        fetch(ctx, &id).await
    }

    async fn locations(&self, ctx: &Context<'_>) -> Result<Vec<Location>> {
        list(ctx).await
    }

    async fn participant(&self, ctx: &Context<'_>, id: ID) -> Result<Participant> {
        fetch(ctx, &id).await
    }

    async fn participants(&self, ctx: &Context<'_>) -> Result<Vec<Participant>> {
        list(ctx).await
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    // User
    async fn create_user(&self, ctx: &Context<'_>, data: CreateUserInput) -> Result<User> {
        create::<User>(ctx, data).await
    }

    async fn update_user(&self, ctx: &Context<'_>, id: ID, data: UpdateUserInput) -> Result<User> {
        update::<User>(ctx, &id, data).await
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<User> {
        delete::<User>(ctx, &id).await
    }

    async fn delete_all_users(&self, ctx: &Context<'_>) -> Result<DeleteAllOutput> {
        delete_all::<User>(ctx).await
    }

    // Event
    async fn create_event(&self, ctx: &Context<'_>, data: CreateEventInput) -> Result<Event> {
        create::<Event>(ctx, data).await
    }

    async fn update_event(&self, ctx: &Context<'_>, id: ID, data: UpdateEventInput) -> Result<Event> {
        update::<Event>(ctx, &id, data).await
    }

    async fn delete_event(&self, ctx: &Context<'_>, id: ID) -> Result<Event> {
        delete::<Event>(ctx, &id).await
    }

    async fn delete_all_events(&self, ctx: &Context<'_>) -> Result<DeleteAllOutput> {
        delete_all::<Event>(ctx).await
    }

    // Location
    async fn create_location(&self, ctx: &Context<'_>, data: CreateLocationInput) -> Result<Location> {
        create::<Location>(ctx, data).await
    }

    async fn update_location(&self, ctx: &Context<'_>, id: ID, data: UpdateLocationInput) -> Result<Location> {
        update::<Location>(ctx, &id, data).await
    }

    async fn delete_location(&self, ctx: &Context<'_>, id: ID) -> Result<Location> {
        delete::<Location>(ctx, &id).await
    }

    async fn delete_all_locations(&self, ctx: &Context<'_>) -> Result<DeleteAllOutput> {
        delete_all::<Location>(ctx).await
    }

    // Participant
    async fn create_participant(&self, ctx: &Context<'_>, data: CreateParticipantInput) -> Result<Participant> {
        create::<Participant>(ctx, data).await
    }

    async fn update_participant(&self, ctx: &Context<'_>, id: ID, data: UpdateParticipantInput) -> Result<Participant> {
        update::<Participant>(ctx, &id, data).await
    }

    async fn delete_participant(&self, ctx: &Context<'_>, id: ID) -> Result<Participant> {
        delete::<Participant>(ctx, &id).await
    }

    async fn delete_all_participants(&self, ctx: &Context<'_>) -> Result<DeleteAllOutput> {
        delete_all::<Participant>(ctx).await
    }
}

// ========== Entity objects ==========
//
// Resolver methods carry a `field_` prefix so they never shadow the
// record's own fields or `Record::id`.

#[Object]
impl User {
    #[graphql(name = "id")]
    async fn field_id(&self) -> ID {
        ID(self.id.to_string())
    }

    #[graphql(name = "username")]
    async fn field_username(&self) -> &str {
        &self.username
    }

    #[graphql(name = "email")]
    async fn field_email(&self) -> &str {
        &self.email
    }

    #[graphql(name = "events")]
    async fn field_events(&self, ctx: &Context<'_>) -> Result<Vec<Event>> {
        let store = shared(ctx)?.read().await;
        Ok(relations::user_events(&store, self).into_iter().cloned().collect())
    }
}

#[Object]
impl Event {
    #[graphql(name = "id")]
    async fn field_id(&self) -> ID {
        ID(self.id.to_string())
    }

    #[graphql(name = "title")]
    async fn field_title(&self) -> &str {
        &self.title
    }

    #[graphql(name = "desc")]
    async fn field_desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    #[graphql(name = "date")]
    async fn field_date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    #[graphql(name = "from")]
    async fn field_from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    #[graphql(name = "to")]
    async fn field_to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    #[graphql(name = "location_id")]
    async fn field_location_id(&self) -> ID {
        ID(self.location_id.as_str().to_string())
    }

    #[graphql(name = "location")]
    async fn field_location(&self, ctx: &Context<'_>) -> Result<Option<Location>> {
        let store = shared(ctx)?.read().await;
        Ok(relations::event_location(&store, self).cloned())
    }

    #[graphql(name = "user_id")]
    async fn field_user_id(&self) -> ID {
        ID(self.user_id.as_str().to_string())
    }

    #[graphql(name = "user")]
    async fn field_user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let store = shared(ctx)?.read().await;
        Ok(relations::event_user(&store, self).cloned())
    }

    #[graphql(name = "participants")]
    async fn field_participants(&self, ctx: &Context<'_>) -> Result<Vec<Participant>> {
        let store = shared(ctx)?.read().await;
        Ok(relations::event_participants(&store, self).into_iter().cloned().collect())
    }
}

#[Object]
impl Location {
    #[graphql(name = "id")]
    async fn field_id(&self) -> ID {
        ID(self.id.to_string())
    }

    #[graphql(name = "name")]
    async fn field_name(&self) -> &str {
        &self.name
    }

    #[graphql(name = "desc")]
    async fn field_desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    #[graphql(name = "lat")]
    async fn field_lat(&self) -> Option<f64> {
        self.lat
    }

    #[graphql(name = "lng")]
    async fn field_lng(&self) -> Option<f64> {
        self.lng
    }

    #[graphql(name = "events")]
    async fn field_events(&self, ctx: &Context<'_>) -> Result<Vec<Event>> {
        let store = shared(ctx)?.read().await;
        Ok(relations::location_events(&store, self).into_iter().cloned().collect())
    }
}

#[Object]
impl Participant {
    #[graphql(name = "id")]
    async fn field_id(&self) -> ID {
        ID(self.id.to_string())
    }

    #[graphql(name = "user_id")]
    async fn field_user_id(&self) -> ID {
        ID(self.user_id.as_str().to_string())
    }

    #[graphql(name = "user")]
    async fn field_user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let store = shared(ctx)?.read().await;
        Ok(relations::participant_user(&store, self).cloned())
    }

    #[graphql(name = "event_id")]
    async fn field_event_id(&self) -> ID {
        ID(self.event_id.as_str().to_string())
    }

    #[graphql(name = "event")]
    async fn field_event(&self, ctx: &Context<'_>) -> Result<Option<Event>> {
        let store = shared(ctx)?.read().await;
        Ok(relations::participant_event(&store, self).cloned())
    }
}
