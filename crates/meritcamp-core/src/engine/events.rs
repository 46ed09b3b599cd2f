use tracing::info;

use super::Registry;
use crate::error::{Error, Result};
use crate::models::{Event, EventInput, EventUpdate};
use crate::rules::access;

/// Earliest year accepted for an event
const MIN_EVENT_YEAR: i32 = 2000;

fn validate_event(event: &Event) -> Result<()> {
    if event.year < MIN_EVENT_YEAR {
        return Err(Error::BadRequest(format!("year must be {} or later", MIN_EVENT_YEAR)));
    }
    if event.registration_open > event.registration_close {
        return Err(Error::bad_request("registration must open before it closes"));
    }
    if event.registration_close > event.date {
        return Err(Error::bad_request("registration must close by the event date"));
    }
    if event.price.is_negative() {
        return Err(Error::bad_request("price must not be negative"));
    }
    Ok(())
}

impl Registry {
    /// `GET /api/events`, ordered by date
    pub async fn list_events(&self) -> Vec<Event> {
        let state = self.state.read().await;
        let mut events: Vec<Event> = state.events.values().cloned().collect();
        events.sort_by_key(|e| (e.date, e.id));
        events
    }

    /// `GET /api/events/:id`
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        self.state.read().await.event(event_id).cloned()
    }

    /// `POST /api/events` (admin)
    pub async fn create_event(&self, token: Option<&str>, input: &EventInput) -> Result<Event> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        let duplicate = state
            .events
            .values()
            .any(|e| e.year == input.year && e.semester == input.semester);
        if duplicate {
            return Err(Error::BadRequest(format!(
                "an event for {} {} already exists",
                input.semester, input.year
            )));
        }
        let mut event = Event {
            id: 0,
            year: input.year,
            semester: input.semester,
            date: input.date,
            registration_open: input.registration_open,
            registration_close: input.registration_close,
            price: input.price,
        };
        validate_event(&event)?;
        event.id = state.next_id();
        state.events.insert(event.id, event.clone());
        info!(event_id = event.id, label = %event.label(), "Event created");
        Ok(event)
    }

    /// `PUT /api/events/:id` (admin)
    pub async fn update_event(
        &self,
        token: Option<&str>,
        event_id: i64,
        update: &EventUpdate,
    ) -> Result<Event> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        let mut event = state.event(event_id)?.clone();
        if let Some(year) = update.year {
            event.year = year;
        }
        if let Some(semester) = update.semester {
            event.semester = semester;
        }
        if let Some(date) = update.date {
            event.date = date;
        }
        if let Some(open) = update.registration_open {
            event.registration_open = open;
        }
        if let Some(close) = update.registration_close {
            event.registration_close = close;
        }
        if let Some(price) = update.price {
            event.price = price;
        }
        validate_event(&event)?;
        let clash = state
            .events
            .values()
            .any(|e| e.id != event_id && e.year == event.year && e.semester == event.semester);
        if clash {
            return Err(Error::BadRequest(format!(
                "an event for {} already exists",
                event.label()
            )));
        }
        state.events.insert(event_id, event.clone());
        Ok(event)
    }

    /// `DELETE /api/events/:id` (admin). Removes offerings, registrations
    /// and purchasables of the event.
    pub async fn delete_event(&self, token: Option<&str>, event_id: i64) -> Result<()> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        state.event(event_id)?;
        state.remove_event(event_id);
        info!(event_id, "Event deleted");
        Ok(())
    }

    /// `GET /api/events/current`
    pub async fn current_event(&self) -> Result<Event> {
        let state = self.state.read().await;
        let id = state
            .current_event
            .ok_or_else(|| Error::not_found("no current event"))?;
        state.event(id).cloned()
    }

    /// `POST /api/events/current` (admin)
    pub async fn set_current_event(&self, token: Option<&str>, event_id: i64) -> Result<Event> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        let event = state.event(event_id)?.clone();
        state.current_event = Some(event_id);
        info!(event_id, "Current event set");
        Ok(event)
    }
}
