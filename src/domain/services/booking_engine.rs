use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::models::{
    booking::{Booking, NewBookingParams},
    property::Property,
    slot::Slot,
    user::Principal,
};
use crate::domain::ports::{
    BookingRepository, NotificationSender, PaymentGateway, PropertyRepository,
    ReceiptGenerator, SlotRepository,
};
use crate::error::AppError;

pub struct ClaimOutcome {
    pub booking: Booking,
    pub client_secret: String,
}

/// Booking state machine. All slot/booking co-mutation happens inside the
/// repository transactions; the engine sequences them against the payment
/// gateway and fans out notifications after commit.
pub struct BookingEngine {
    property_repo: Arc<dyn PropertyRepository>,
    slot_repo: Arc<dyn SlotRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn NotificationSender>,
    receipts: Arc<dyn ReceiptGenerator>,
}

impl BookingEngine {
    pub fn new(
        property_repo: Arc<dyn PropertyRepository>,
        slot_repo: Arc<dyn SlotRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn NotificationSender>,
        receipts: Arc<dyn ReceiptGenerator>,
    ) -> Self {
        Self { property_repo, slot_repo, booking_repo, payments, notifier, receipts }
    }

    /// Claims an available slot for the user: creates the pending booking
    /// with a payment handle already attached. A gateway failure aborts
    /// the whole claim; a concurrent claim on the same slot loses with
    /// `SlotAlreadyClaimed` at the insert.
    pub async fn claim_slot(
        &self,
        user: &Principal,
        property_id: &str,
        slot_id: &str,
        special_requests: Option<String>,
    ) -> Result<ClaimOutcome, AppError> {
        let property = self.property_repo.find_by_id(property_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Property {} not found", property_id)))?;

        let slot = self.slot_repo.find_by_id(property_id, slot_id).await?
            .ok_or_else(|| AppError::SlotUnavailable("Slot not found for this property".into()))?;
        if slot.status != "AVAILABLE" {
            return Err(AppError::SlotUnavailable("Slot is not open for booking".into()));
        }

        let mut booking = Booking::new(NewBookingParams {
            user_id: user.id.clone(),
            customer_email: user.email.clone(),
            property_id: property.id.clone(),
            slot_id: slot.id.clone(),
            price: slot.effective_price(&property),
            special_requests,
        });

        let intent = self.payments.create_intent(booking.price, &booking.id).await?;
        booking.payment_reference = Some(intent.id);

        let created = self.booking_repo.claim(&booking).await?;
        info!("Slot {} claimed by user {} (booking {})", slot.id, user.id, created.id);

        Ok(ClaimOutcome { booking: created, client_secret: intent.client_secret })
    }

    /// Idempotent payment confirmation shared by the synchronous confirm
    /// endpoint and the gateway webhook. Replaying a confirmation on an
    /// already-confirmed booking is a no-op success; a cancelled or
    /// expired booking rejects a late confirmation.
    pub async fn confirm_payment(&self, booking_id: &str, payment_reference: &str) -> Result<Booking, AppError> {
        let booking = self.booking_repo.find_by_id(booking_id).await?
            .ok_or(AppError::BookingNotFound)?;

        if booking.payment_reference.as_deref() != Some(payment_reference) {
            return Err(AppError::PaymentMismatch);
        }
        if booking.status == "CONFIRMED" && booking.payment_status == "PAID" {
            return Ok(booking);
        }
        if booking.status == "CANCELLED" || booking.status == "EXPIRED" {
            return Err(AppError::Conflict("Booking is no longer awaiting payment".into()));
        }

        let confirmed = match self.booking_repo.confirm_paid(booking_id).await? {
            Some(b) => b,
            None => {
                // Lost the race against a concurrent confirm or expiry.
                let current = self.booking_repo.find_by_id(booking_id).await?
                    .ok_or(AppError::BookingNotFound)?;
                if current.status == "CONFIRMED" {
                    return Ok(current);
                }
                return Err(AppError::Conflict("Booking is no longer awaiting payment".into()));
            }
        };

        info!("Payment confirmed for booking {} (slot {})", confirmed.id, confirmed.slot_id);
        self.notify_confirmation(&confirmed).await;

        Ok(confirmed)
    }

    /// Cancels the user's booking. A paid booking is refunded at the
    /// gateway first; if the refund fails nothing is mutated.
    pub async fn cancel_booking(&self, user: &Principal, booking_id: &str) -> Result<Booking, AppError> {
        let booking = self.booking_repo.find_by_id(booking_id).await?
            .ok_or(AppError::BookingNotFound)?;
        if booking.user_id != user.id {
            return Err(AppError::BookingNotFound);
        }
        if !booking.is_active() {
            return Err(AppError::Conflict("Booking is already finalized".into()));
        }

        let refund_reference = if booking.payment_status == "PAID" {
            let reference = booking.payment_reference.as_deref()
                .ok_or_else(|| AppError::RefundFailed("Booking has no payment reference".into()))?;
            let refund = self.payments.refund(reference).await?;
            Some(refund.id)
        } else {
            None
        };

        let cancelled = self.booking_repo.cancel(booking_id, refund_reference).await?;
        info!("Booking {} cancelled by user {} (slot {} released)", cancelled.id, user.id, cancelled.slot_id);
        self.notify_cancellation(&cancelled).await;

        Ok(cancelled)
    }

    /// Expires one stale pending booking. Returns false when the booking
    /// was confirmed or cancelled between the scan and this call.
    pub async fn expire_booking(&self, booking: &Booking) -> Result<bool, AppError> {
        if !self.booking_repo.expire(&booking.id).await? {
            return Ok(false);
        }

        info!("Booking {} expired, slot {} released", booking.id, booking.slot_id);
        if let Some(expired) = self.booking_repo.find_by_id(&booking.id).await? {
            self.notify_expiration(&expired).await;
        }
        Ok(true)
    }

    async fn load_context(&self, booking: &Booking) -> Result<(Property, Slot), AppError> {
        let property = self.property_repo.find_by_id(&booking.property_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Property {} not found", booking.property_id)))?;
        let slot = self.slot_repo.find_by_id(&booking.property_id, &booking.slot_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Slot {} not found", booking.slot_id)))?;
        Ok((property, slot))
    }

    async fn notify_confirmation(&self, booking: &Booking) {
        let (property, slot) = match self.load_context(booking).await {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!("Skipping confirmation notification for booking {}: {}", booking.id, e);
                return;
            }
        };

        let receipt = match self.receipts.generate(booking, &property, &slot).await {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("Receipt generation failed for booking {}: {}", booking.id, e);
                None
            }
        };

        if let Err(e) = self.notifier.send_confirmation(booking, &property, &slot, receipt.as_ref()).await {
            warn!("Confirmation notification failed for booking {}: {}", booking.id, e);
        }
    }

    async fn notify_cancellation(&self, booking: &Booking) {
        let (property, slot) = match self.load_context(booking).await {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!("Skipping cancellation notification for booking {}: {}", booking.id, e);
                return;
            }
        };
        if let Err(e) = self.notifier.send_cancellation(booking, &property, &slot).await {
            warn!("Cancellation notification failed for booking {}: {}", booking.id, e);
        }
    }

    async fn notify_expiration(&self, booking: &Booking) {
        let (property, slot) = match self.load_context(booking).await {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!("Skipping expiration notification for booking {}: {}", booking.id, e);
                return;
            }
        };
        if let Err(e) = self.notifier.send_expiration(booking, &property, &slot).await {
            warn!("Expiration notification failed for booking {}: {}", booking.id, e);
        }
    }
}
