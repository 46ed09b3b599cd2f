use tracing::{debug, info};

use super::{required, Registry};
use crate::error::{Error, Result};
use crate::models::{
    Badge, BadgeInput, BadgeUpdate, Offering, OfferingInput, OfferingUpdate, Purchasable,
    PurchasableInput, PurchasableUpdate,
};
use crate::rules::{access, completion, periods};

/// Upper bound for a purchasable's age limits
const MAX_AGE: u32 = 120;

fn validate_purchasable(purchasable: &Purchasable) -> Result<()> {
    if purchasable.price.is_negative() {
        return Err(Error::bad_request("price must not be negative"));
    }
    for age in [purchasable.minimum_age, purchasable.maximum_age].into_iter().flatten() {
        if age > MAX_AGE {
            return Err(Error::BadRequest(format!(
                "age limit {} is above {}",
                age, MAX_AGE
            )));
        }
    }
    if let (Some(min), Some(max)) = (purchasable.minimum_age, purchasable.maximum_age) {
        if min > max {
            return Err(Error::bad_request("minimum age is greater than maximum age"));
        }
    }
    if purchasable.purchaser_limit == Some(0) {
        return Err(Error::bad_request("purchaser limit must be at least 1"));
    }
    Ok(())
}

impl Registry {
    // ===== Badges =====

    /// `GET /api/badges`, ordered by name
    pub async fn list_badges(&self) -> Vec<Badge> {
        let state = self.state.read().await;
        let mut badges: Vec<Badge> = state.badges.values().cloned().collect();
        badges.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        badges
    }

    /// `GET /api/badges/:id`
    pub async fn get_badge(&self, badge_id: i64) -> Result<Badge> {
        self.state.read().await.badge(badge_id).cloned()
    }

    /// `POST /api/badges` (admin)
    pub async fn create_badge(&self, token: Option<&str>, input: &BadgeInput) -> Result<Badge> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;
        let name = required("name", &input.name)?;

        let mut state = self.state.write().await;
        if state.badges.values().any(|b| b.name.eq_ignore_ascii_case(&name)) {
            return Err(Error::BadRequest(format!("badge already exists: {}", name)));
        }
        let badge = Badge {
            id: state.next_id(),
            name,
            description: input.description.trim().to_string(),
            notes: input.notes.clone(),
        };
        state.badges.insert(badge.id, badge.clone());
        debug!(badge_id = badge.id, name = %badge.name, "Badge created");
        Ok(badge)
    }

    /// `PUT /api/badges/:id` (admin)
    pub async fn update_badge(
        &self,
        token: Option<&str>,
        badge_id: i64,
        update: &BadgeUpdate,
    ) -> Result<Badge> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;
        let name = update.name.as_deref().map(|n| required("name", n)).transpose()?;

        let mut state = self.state.write().await;
        let mut badge = state.badge(badge_id)?.clone();
        if let Some(name) = name {
            let taken = state
                .badges
                .values()
                .any(|b| b.id != badge_id && b.name.eq_ignore_ascii_case(&name));
            if taken {
                return Err(Error::BadRequest(format!("badge already exists: {}", name)));
            }
            badge.name = name;
        }
        if let Some(ref description) = update.description {
            badge.description = description.trim().to_string();
        }
        if let Some(ref notes) = update.notes {
            badge.notes = Some(notes.clone());
        }
        state.badges.insert(badge_id, badge.clone());
        Ok(badge)
    }

    /// `DELETE /api/badges/:id` (admin). A badge still offered at an event
    /// cannot be deleted.
    pub async fn delete_badge(&self, token: Option<&str>, badge_id: i64) -> Result<()> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        state.badge(badge_id)?;
        if state.offerings.values().any(|o| o.badge_id == badge_id) {
            return Err(Error::bad_request("badge is offered at an event"));
        }
        state.badges.remove(&badge_id);
        Ok(())
    }

    // ===== Offerings =====

    /// `GET /api/events/:id/offerings`
    pub async fn list_offerings(&self, event_id: i64) -> Result<Vec<Offering>> {
        let state = self.state.read().await;
        state.event(event_id)?;
        Ok(state
            .offerings
            .values()
            .filter(|o| o.event_id == event_id)
            .cloned()
            .collect())
    }

    /// `POST /api/events/:id/offerings` (admin)
    pub async fn create_offering(
        &self,
        token: Option<&str>,
        event_id: i64,
        input: &OfferingInput,
    ) -> Result<Offering> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;
        let periods = periods::validate_offering(&input.periods, input.duration)?;
        let requirements = completion::normalize_requirements(&input.requirements)?;
        if input.price.is_negative() {
            return Err(Error::bad_request("price must not be negative"));
        }
        if input.size_limit == Some(0) {
            return Err(Error::bad_request("size limit must be at least 1"));
        }

        let mut state = self.state.write().await;
        state.event(event_id)?;
        state.badge(input.badge_id)?;
        let duplicate = state
            .offerings
            .values()
            .any(|o| o.event_id == event_id && o.badge_id == input.badge_id);
        if duplicate {
            return Err(Error::bad_request("badge is already offered at this event"));
        }
        let offering = Offering {
            id: state.next_id(),
            badge_id: input.badge_id,
            event_id,
            price: input.price,
            periods,
            duration: input.duration,
            requirements,
            size_limit: input.size_limit.unwrap_or(self.config.default_size_limit),
        };
        state.offerings.insert(offering.id, offering.clone());
        info!(offering_id = offering.id, event_id, badge_id = offering.badge_id, "Offering created");
        Ok(offering)
    }

    /// `PUT /api/events/:id/offerings/:offering_id` (admin).
    ///
    /// A new requirement list is reconciled into every assignment's
    /// completion record. Existing assignments are kept when periods or the
    /// size limit shrink.
    pub async fn update_offering(
        &self,
        token: Option<&str>,
        event_id: i64,
        offering_id: i64,
        update: &OfferingUpdate,
    ) -> Result<Offering> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        let mut offering = state.offering_in(event_id, offering_id)?.clone();
        if let Some(price) = update.price {
            if price.is_negative() {
                return Err(Error::bad_request("price must not be negative"));
            }
            offering.price = price;
        }
        if update.periods.is_some() || update.duration.is_some() {
            let periods = update.periods.as_deref().unwrap_or(&offering.periods);
            let duration = update.duration.unwrap_or(offering.duration);
            offering.periods = periods::validate_offering(periods, duration)?;
            offering.duration = duration;
        }
        if let Some(limit) = update.size_limit {
            if limit == 0 {
                return Err(Error::bad_request("size limit must be at least 1"));
            }
            offering.size_limit = limit;
        }
        let requirements_changed = match update.requirements {
            Some(ref requirements) => {
                offering.requirements = completion::normalize_requirements(requirements)?;
                true
            }
            None => false,
        };

        if requirements_changed {
            let mut reconciled = 0;
            for assignment in state
                .assignments
                .iter_mut()
                .filter(|a| a.offering_id == offering_id)
            {
                assignment.completions =
                    completion::reconcile(&assignment.completions, &offering.requirements);
                reconciled += 1;
            }
            debug!(offering_id, reconciled, "Reconciled completion records");
        }
        state.offerings.insert(offering_id, offering.clone());
        Ok(offering)
    }

    /// `DELETE /api/events/:id/offerings/:offering_id` (admin). Removes the
    /// offering's assignments and preferences.
    pub async fn delete_offering(
        &self,
        token: Option<&str>,
        event_id: i64,
        offering_id: i64,
    ) -> Result<()> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        state.offering_in(event_id, offering_id)?;
        state.remove_offering(offering_id);
        info!(offering_id, event_id, "Offering deleted");
        Ok(())
    }

    // ===== Purchasables =====

    /// `GET /api/events/:id/purchasables`
    pub async fn list_purchasables(&self, event_id: i64) -> Result<Vec<Purchasable>> {
        let state = self.state.read().await;
        state.event(event_id)?;
        Ok(state
            .purchasables
            .values()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect())
    }

    /// `POST /api/events/:id/purchasables` (admin)
    pub async fn create_purchasable(
        &self,
        token: Option<&str>,
        event_id: i64,
        input: &PurchasableInput,
    ) -> Result<Purchasable> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;
        let item = required("item", &input.item)?;

        let mut state = self.state.write().await;
        state.event(event_id)?;
        let mut purchasable = Purchasable {
            id: 0,
            event_id,
            item,
            description: input.description.trim().to_string(),
            price: input.price,
            has_size: input.has_size,
            minimum_age: input.minimum_age,
            maximum_age: input.maximum_age,
            purchaser_limit: input.purchaser_limit,
        };
        validate_purchasable(&purchasable)?;
        purchasable.id = state.next_id();
        state.purchasables.insert(purchasable.id, purchasable.clone());
        debug!(purchasable_id = purchasable.id, event_id, "Purchasable created");
        Ok(purchasable)
    }

    /// `PUT /api/events/:id/purchasables/:purchasable_id` (admin). A limit
    /// below the quantity already sold is rejected. An explicit `null` clears
    /// a limit or age bound.
    pub async fn update_purchasable(
        &self,
        token: Option<&str>,
        event_id: i64,
        purchasable_id: i64,
        update: &PurchasableUpdate,
    ) -> Result<Purchasable> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;
        let item = update.item.as_deref().map(|i| required("item", i)).transpose()?;

        let mut state = self.state.write().await;
        let mut purchasable = state.purchasable_in(event_id, purchasable_id)?.clone();
        if let Some(item) = item {
            purchasable.item = item;
        }
        if let Some(ref description) = update.description {
            purchasable.description = description.trim().to_string();
        }
        if let Some(price) = update.price {
            purchasable.price = price;
        }
        if let Some(has_size) = update.has_size {
            if has_size != purchasable.has_size
                && state.purchases.values().any(|p| p.purchasable_id == purchasable_id)
            {
                return Err(Error::BadRequest(format!(
                    "{} has already been purchased; its sizing cannot change",
                    purchasable.item
                )));
            }
            purchasable.has_size = has_size;
        }
        if let Some(minimum_age) = update.minimum_age {
            purchasable.minimum_age = minimum_age;
        }
        if let Some(maximum_age) = update.maximum_age {
            purchasable.maximum_age = maximum_age;
        }
        if let Some(limit) = update.purchaser_limit {
            let sold = state.purchased_quantity(purchasable_id, None);
            if let Some(limit) = limit.filter(|&l| u64::from(l) < sold) {
                return Err(Error::BadRequest(format!(
                    "purchaser limit {} is below the {} already purchased",
                    limit, sold
                )));
            }
            purchasable.purchaser_limit = limit;
        }
        validate_purchasable(&purchasable)?;
        state.purchasables.insert(purchasable_id, purchasable.clone());
        Ok(purchasable)
    }

    /// `DELETE /api/events/:id/purchasables/:purchasable_id` (admin).
    /// Removes purchases of the item.
    pub async fn delete_purchasable(
        &self,
        token: Option<&str>,
        event_id: i64,
        purchasable_id: i64,
    ) -> Result<()> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        state.purchasable_in(event_id, purchasable_id)?;
        state.remove_purchasable(purchasable_id);
        Ok(())
    }
}
