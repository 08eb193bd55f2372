use std::time::Duration;

use egui::{Align2, Context, Frame, Id, Order, RichText};

/// Seconds a notification stays on screen.
pub const TOAST_LIFETIME: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
struct Toast {
    message: String,
    expires_at: f64,
}

/// Short lived error notifications in the top right corner.
///
/// Times are egui input times, in seconds.
#[derive(Debug, Default)]
pub struct Toasts {
    toasts: Vec<Toast>,
}

impl Toasts {
    pub fn error(&mut self, message: impl Into<String>, now: f64) {
        self.toasts.push(Toast {
            message: message.into(),
            expires_at: now + TOAST_LIFETIME,
        });
    }

    pub fn expire(&mut self, now: f64) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.toasts.iter().map(|toast| toast.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn ui(&mut self, ctx: &Context) {
        let now = ctx.input(|input| input.time);
        self.expire(now);
        if self.toasts.is_empty() {
            return;
        }

        let mut closed = None;
        egui::Area::new(Id::new("toasts"))
            .anchor(Align2::RIGHT_TOP, [-12.0, 36.0])
            .order(Order::Foreground)
            .show(ctx, |ui| {
                for (index, toast) in self.toasts.iter().enumerate() {
                    Frame::popup(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let color = ui.visuals().error_fg_color;
                            ui.label(RichText::new(&toast.message).color(color));
                            if ui.small_button("✖").clicked() {
                                closed = Some(index);
                            }
                        });
                    });
                }
            });
        if let Some(index) = closed {
            self.toasts.remove(index);
        }

        // wake up in time to hide the next one
        if let Some(next) = self
            .toasts
            .iter()
            .map(|toast| toast.expires_at)
            .min_by(f64::total_cmp)
        {
            ctx.request_repaint_after(Duration::from_secs_f64((next - now).max(0.0)));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn toasts_expire_after_their_lifetime() {
        let mut toasts = Toasts::default();
        toasts.error("City not found: atlantis", 10.0);
        toasts.error("Network error", 11.5);

        toasts.expire(12.9);
        assert_eq!(toasts.messages().count(), 2);

        toasts.expire(13.0);
        assert_eq!(toasts.messages().collect::<Vec<_>>(), vec!["Network error"]);

        toasts.expire(14.5);
        assert!(toasts.is_empty());
    }
}
