//! Subcommand implementations.

use std::io::{BufRead, IsTerminal};

use anyhow::{Context as _, Result, bail};
use chrono::{DateTime, Local};
use newsletters_core::{
    Context, CredentialStore, Credentials, FirestoreService, GroupedView, KeyringStore,
    MetadataSource,
    NewsletterId, NewsletterRecord, NewsletterState, ReaderBody, SnapshotCache, ToggleOutcome,
    open_newsletter, save_and_sign_in, sign_in_with_stored, toggle_read,
};
use newsletters_firestore::{Document, FirestoreClient, FirestoreConfig};
use tracing::{info, warn};

use crate::notify::{ArrivalTracker, notify_arrivals};
use crate::render::{Style, render_reader, render_view};
use crate::settings::{self, AppSettings};

fn style() -> Style {
    if std::io::stdout().is_terminal() {
        Style { ansi: true }
    } else {
        Style::PLAIN
    }
}

fn service_for(settings: &AppSettings) -> Result<FirestoreService> {
    if !settings.is_configured() {
        bail!("No project configured. Run `newsletters configure` first.");
    }
    let client = FirestoreClient::new(FirestoreConfig::new(
        settings.project_id.clone(),
        settings.api_key.clone(),
    ));
    Ok(FirestoreService::new(client)
        .with_collections(settings.collections())
        .with_poll_interval(settings.poll_interval()))
}

/// Signs in with the stored credentials.
async fn connect(settings: &AppSettings) -> Result<FirestoreService> {
    let mut service = service_for(settings)?;
    if sign_in_with_stored(&mut service, &KeyringStore).await?.is_none() {
        bail!("Not signed in. Run `newsletters login --email <EMAIL>` first.");
    }
    Ok(service)
}

async fn open_cache() -> Option<SnapshotCache> {
    let dir = settings::data_dir();
    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
        warn!("Cache unavailable: {e}");
        return None;
    }
    let path = settings::cache_path();
    match SnapshotCache::new(&path.to_string_lossy()).await {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!("Cache unavailable: {e}");
            None
        }
    }
}

/// Signs in and loads the current snapshot into fresh state.
async fn load_remote(settings: &AppSettings) -> Result<(FirestoreService, NewsletterState)> {
    let service = connect(settings).await?;
    let documents = service.fetch_snapshot().await?;
    let mut state = NewsletterState::new();
    state.apply_snapshot(&documents)?;
    Ok((service, state))
}

async fn remember(cache: Option<&SnapshotCache>, records: &[NewsletterRecord]) {
    if let Some(cache) = cache
        && let Err(e) = cache.replace_snapshot(records).await
    {
        warn!("Failed to cache snapshot: {e}");
    }
}

pub async fn configure(project_id: String, api_key: String, poll_interval: Option<u64>) -> Result<()> {
    let mut settings = settings::load_settings().await.unwrap_or_default();
    settings.project_id = project_id;
    settings.api_key = api_key;
    if let Some(secs) = poll_interval {
        settings.poll_interval_secs = secs;
    }
    let path = settings::save_settings(&settings).await?;
    println!("Settings saved to {}", path.display());
    Ok(())
}

fn read_password() -> Result<String> {
    if std::io::stdin().is_terminal() {
        eprint!("Password: ");
    }
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}

pub async fn login(email: String, password: Option<String>) -> Result<()> {
    let settings = settings::load_settings().await?;
    let mut service = service_for(&settings)?;
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    let credentials = Credentials::new(email, password);

    save_and_sign_in(&mut service, &KeyringStore, &credentials)
        .await
        .context("Sign-in failed; credentials were saved and will be retried")?;
    println!("Signed in as {}", credentials.email);
    Ok(())
}

pub async fn logout() -> Result<()> {
    KeyringStore.delete()?;
    if let Some(cache) = open_cache().await {
        cache.clear().await?;
    }
    println!("Signed out");
    Ok(())
}

pub async fn show(context: Context, json: bool) -> Result<()> {
    let settings = settings::load_settings().await?;
    let cache = open_cache().await;

    let state = match load_remote(&settings).await {
        Ok((_, state)) => {
            remember(cache.as_ref(), state.records()).await;
            state
        }
        Err(e) => {
            let Some(cached) = cached_state(cache.as_ref()).await else {
                return Err(e);
            };
            eprintln!("Offline ({e:#}); showing cached newsletters");
            cached
        }
    };

    let view = state.view(context, &Local::now());
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_view(&view, &Local, style()));
    }
    Ok(())
}

async fn cached_state(cache: Option<&SnapshotCache>) -> Option<NewsletterState> {
    let snapshot = match cache?.load_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Failed to load cached snapshot: {e}");
            return None;
        }
    };
    if snapshot.is_empty() {
        return None;
    }
    info!("Using snapshot cached at {:?}", snapshot.cached_at);
    let mut state = NewsletterState::new();
    state.replace(snapshot.records);
    Some(state)
}

fn find_record(state: &NewsletterState, id: &NewsletterId) -> Result<NewsletterRecord> {
    state
        .get(id)
        .cloned()
        .with_context(|| format!("No newsletter with ID {id}"))
}

async fn mirror_toggle(cache: Option<&SnapshotCache>, outcome: &ToggleOutcome) {
    if let (Some(cache), ToggleOutcome::Updated { id, is_read, .. }) = (cache, outcome)
        && let Err(e) = cache.update_is_read(id, *is_read).await
    {
        warn!("Failed to update cached read flag: {e}");
    }
}

pub async fn open(id: String, raw: bool) -> Result<()> {
    let id = NewsletterId::new(id);
    let settings = settings::load_settings().await?;
    let cache = open_cache().await;

    let (record, body) = match load_remote(&settings).await {
        Ok((service, state)) => {
            let record = find_record(&state, &id)?;
            let state = tokio::sync::RwLock::new(state);
            let opened = open_newsletter(&service, &state, &record).await;
            if let Some(outcome) = &opened.toggle {
                mirror_toggle(cache.as_ref(), outcome).await;
            }
            if let (Some(cache), Some(body)) = (cache.as_ref(), opened.body.as_loaded())
                && let Err(e) = cache.cache_body(&id, body).await
            {
                warn!("Failed to cache body: {e}");
            }
            let records = state.read().await.records().to_vec();
            remember(cache.as_ref(), &records).await;
            (opened.record, opened.body)
        }
        Err(e) => {
            let state = cached_state(cache.as_ref()).await.ok_or(e)?;
            eprintln!("Offline; showing cached newsletter");
            let record = find_record(&state, &id)?;
            let body = match cache.as_ref() {
                Some(cache) => cache.get_body(&id).await?.map(|b| b.body),
                None => None,
            };
            (record, body.map_or(ReaderBody::NotFound, ReaderBody::Loaded))
        }
    };

    print!("{}", render_reader(&record, &body, raw, style()));
    Ok(())
}

pub async fn toggle(id: String) -> Result<()> {
    let id = NewsletterId::new(id);
    let settings = settings::load_settings().await?;
    let cache = open_cache().await;

    let (service, state) = load_remote(&settings).await?;
    let record = find_record(&state, &id)?;
    let state = tokio::sync::RwLock::new(state);

    let outcome = toggle_read(&service, &state, &record).await;
    mirror_toggle(cache.as_ref(), &outcome).await;
    match outcome {
        ToggleOutcome::Updated { is_read, .. } => {
            println!("{id} marked {}", if is_read { "read" } else { "unread" });
            Ok(())
        }
        ToggleOutcome::Failed { error, .. } => bail!("Failed to update {id}: {error}"),
        ToggleOutcome::Skipped => bail!("Newsletter has no ID"),
    }
}

/// What a watched delivery produced, copied out of the shared state.
struct AcceptedDelivery {
    records: Vec<NewsletterRecord>,
    today: GroupedView,
    view: GroupedView,
}

/// Applies a delivery and copies out what rendering and caching need, so the
/// caller can release the state lock before any I/O. `None` if rejected.
fn accept_delivery(
    state: &mut NewsletterState,
    documents: &[Document],
    context: Context,
    now: &DateTime<Local>,
) -> Option<AcceptedDelivery> {
    state.apply_snapshot(documents).ok()?;
    Some(AcceptedDelivery {
        records: state.records().to_vec(),
        today: state.view(Context::Today, now),
        view: state.view(context, now),
    })
}

pub async fn watch(context: Context, notify: bool) -> Result<()> {
    let settings = settings::load_settings().await?;
    let cache = open_cache().await;
    let service = connect(&settings).await?;
    let state = NewsletterState::shared();
    let mut tracker = ArrivalTracker::default();

    let mut subscription = service.subscribe();
    info!("Watching {} newsletters", context.display_name());

    loop {
        let delivery = tokio::select! {
            delivery = subscription.next() => delivery,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(delivery) = delivery else {
            break;
        };

        let documents = match delivery {
            Ok(documents) => documents,
            Err(e) => {
                warn!("Error receiving snapshot: {e}");
                continue;
            }
        };

        let now = Local::now();
        let accepted = {
            let mut guard = state.write().await;
            accept_delivery(&mut guard, &documents, context, &now)
        };
        let Some(accepted) = accepted else {
            continue;
        };
        remember(cache.as_ref(), &accepted.records).await;

        let arrivals = tracker.arrivals(&accepted.today);
        if notify && !arrivals.is_empty() {
            notify_arrivals(&accepted.today, &arrivals);
        }

        println!("--- {} ({}) ---", context.display_name(), now.format("%H:%M"));
        print!("{}", render_view(&accepted.view, &Local, style()));
    }

    subscription.cancel();
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use newsletters_core::newsletter::fields;

    fn doc(id: &str, subject: &str, date: DateTime<Local>) -> Document {
        Document::new(format!("NewsletterMetadata/{id}"))
            .with_field(fields::SENDER, "HEATED <e@heated.world>")
            .with_field(fields::SUBJECT, subject)
            .with_field(fields::NEWSLETTER_DATE, date.with_timezone(&chrono::Utc))
    }

    #[test]
    fn test_accept_delivery_copies_views() {
        let now = Local.with_ymd_and_hms(2025, 4, 3, 20, 0, 0).unwrap();
        let earlier = Local.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
        let mut state = NewsletterState::new();

        let accepted = accept_delivery(
            &mut state,
            &[doc("a", "Today", now), doc("b", "Old", earlier)],
            Context::Historical,
            &now,
        )
        .unwrap();

        assert_eq!(accepted.records.len(), 2);
        assert_eq!(accepted.today.record_count(), 1);
        assert_eq!(accepted.view.record_count(), 1);
        assert_eq!(accepted.view.groups[0].items[0].subject, "Old");
    }

    #[test]
    fn test_accept_delivery_rejects_malformed_batch() {
        let now = Local.with_ymd_and_hms(2025, 4, 3, 20, 0, 0).unwrap();
        let mut state = NewsletterState::new();
        accept_delivery(&mut state, &[doc("a", "Kept", now)], Context::Today, &now).unwrap();

        let broken = Document::new("NewsletterMetadata/x").with_field(fields::SENDER, "X <x@x>");
        assert!(accept_delivery(&mut state, &[broken], Context::Today, &now).is_none());
        assert_eq!(state.records()[0].subject, "Kept");
    }
}
