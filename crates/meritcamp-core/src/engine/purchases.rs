use tracing::debug;

use super::Registry;
use crate::error::{Error, Result};
use crate::models::{Purchasable, Purchase, PurchaseInput, PurchaseUpdate, Size};
use crate::rules::{access, capacity, eligibility};

fn check_size(purchasable: &Purchasable, size: Option<Size>) -> Result<()> {
    match (purchasable.has_size, size) {
        (true, None) => Err(Error::BadRequest(format!(
            "{} requires a size",
            purchasable.item
        ))),
        (false, Some(_)) => Err(Error::BadRequest(format!(
            "{} does not come in sizes",
            purchasable.item
        ))),
        _ => Ok(()),
    }
}

fn check_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        Err(Error::bad_request("quantity must be at least 1"))
    } else if quantity > capacity::MAX_QUANTITY {
        Err(Error::BadRequest(format!(
            "quantity {} exceeds the maximum of {}",
            quantity,
            capacity::MAX_QUANTITY
        )))
    } else {
        Ok(())
    }
}

impl Registry {
    /// `GET .../purchases`
    pub async fn list_purchases(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
    ) -> Result<Vec<Purchase>> {
        let caller = self.caller(token).await?;
        let state = self.state.read().await;
        access::require_owner_or_staff(&caller, state.scout(scout_id)?.user_id)?;
        state.registration_of(scout_id, registration_id)?;
        Ok(state.purchases_of(registration_id).cloned().collect())
    }

    /// `POST .../purchases`.
    ///
    /// The item must be sold at the registration's event, the scout's age on
    /// the event date must fall inside its window, and the purchaser limit
    /// counts every unit already sold.
    pub async fn create_purchase(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
        input: &PurchaseInput,
    ) -> Result<Purchase> {
        let caller = self.caller(token).await?;
        check_quantity(input.quantity)?;

        let mut state = self.state.write().await;
        let scout = state.scout(scout_id)?.clone();
        access::require_owner_or_admin(&caller, scout.user_id)?;
        let registration = state.registration_of(scout_id, registration_id)?.clone();
        let purchasable = state
            .purchasables
            .get(&input.purchasable_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("purchasable {}", input.purchasable_id)))?;
        if purchasable.event_id != registration.event_id {
            return Err(Error::bad_request(
                "item is not sold at the registration's event",
            ));
        }
        check_size(&purchasable, input.size)?;
        let event_date = state.event(registration.event_id)?.date;
        eligibility::check_age_window(&purchasable, scout.age_on(event_date))?;
        let sold = state.purchased_quantity(purchasable.id, None);
        if let Err(err) =
            capacity::check_purchaser_limit(purchasable.purchaser_limit, sold, input.quantity)
        {
            debug!(purchasable_id = purchasable.id, sold, "Purchaser limit reached");
            return Err(err);
        }

        let purchase = Purchase {
            id: state.next_id(),
            registration_id,
            purchasable_id: purchasable.id,
            quantity: input.quantity,
            size: input.size,
        };
        state.purchases.insert(purchase.id, purchase.clone());
        debug!(purchase_id = purchase.id, registration_id, "Purchase created");
        Ok(purchase)
    }

    /// `PUT .../purchases/:purchase_id`. The limit is rechecked without the
    /// purchase's previous quantity.
    pub async fn update_purchase(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
        purchase_id: i64,
        update: &PurchaseUpdate,
    ) -> Result<Purchase> {
        let caller = self.caller(token).await?;
        let mut state = self.state.write().await;
        access::require_owner_or_admin(&caller, state.scout(scout_id)?.user_id)?;
        state.registration_of(scout_id, registration_id)?;
        let mut purchase = state.purchase_of(registration_id, purchase_id)?.clone();
        let purchasable = state
            .purchasables
            .get(&purchase.purchasable_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("purchasable {}", purchase.purchasable_id)))?;

        if let Some(quantity) = update.quantity {
            check_quantity(quantity)?;
            let sold = state.purchased_quantity(purchasable.id, Some(purchase_id));
            capacity::check_purchaser_limit(purchasable.purchaser_limit, sold, quantity)?;
            purchase.quantity = quantity;
        }
        if update.size.is_some() {
            check_size(&purchasable, update.size)?;
            purchase.size = update.size;
        }
        state.purchases.insert(purchase_id, purchase.clone());
        Ok(purchase)
    }

    /// `DELETE .../purchases/:purchase_id`
    pub async fn delete_purchase(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
        purchase_id: i64,
    ) -> Result<()> {
        let caller = self.caller(token).await?;
        let mut state = self.state.write().await;
        access::require_owner_or_admin(&caller, state.scout(scout_id)?.user_id)?;
        state.registration_of(scout_id, registration_id)?;
        state.purchase_of(registration_id, purchase_id)?;
        state.purchases.remove(&purchase_id);
        Ok(())
    }
}
