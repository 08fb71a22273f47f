//! Transient notifications in a corner of the screen.

use std::time::Duration;

use leptos::prelude::*;

/// How long a toast stays up.
pub const TOAST_TIMEOUT: Duration = Duration::from_secs(4);

/// Color and intent of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
	/// Something worked.
	Success,
	/// Something failed.
	Error,
	/// Neutral status.
	Info,
}

impl ToastKind {
	fn class(self) -> &'static str {
		match self {
			ToastKind::Success => "toast toast-success",
			ToastKind::Error => "toast toast-error",
			ToastKind::Info => "toast toast-info",
		}
	}
}

/// One notification on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
	/// Handle for dismissing it.
	pub id: u64,
	/// Kind.
	pub kind: ToastKind,
	/// Text shown.
	pub message: String,
}

/// Visible toasts, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ToastQueue {
	next_id: u64,
	items: Vec<Toast>,
}

impl ToastQueue {
	/// Queue a toast and return its id.
	pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
		self.next_id += 1;
		self.items.push(Toast {
			id: self.next_id,
			kind,
			message: message.into(),
		});
		self.next_id
	}

	/// Drop the toast with `id`. Unknown ids are ignored.
	pub fn dismiss(&mut self, id: u64) {
		self.items.retain(|toast| toast.id != id);
	}

	/// Toasts in arrival order.
	pub fn items(&self) -> &[Toast] {
		&self.items
	}
}

/// Handle for raising toasts, provided as context by [`ToastHost`].
#[derive(Clone, Copy)]
pub struct Toaster {
	queue: RwSignal<ToastQueue>,
}

impl Toaster {
	/// Show a toast and dismiss it after a few seconds.
	pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
		let queue = self.queue;
		let Some(id) = queue.try_update(|q| q.push(kind, message)) else {
			return;
		};
		set_timeout(
			move || {
				queue.try_update(|q| q.dismiss(id));
			},
			TOAST_TIMEOUT,
		);
	}

	/// Green toast.
	pub fn success(&self, message: impl Into<String>) {
		self.show(ToastKind::Success, message);
	}

	/// Red toast.
	pub fn error(&self, message: impl Into<String>) {
		self.show(ToastKind::Error, message);
	}

	/// Neutral toast.
	pub fn info(&self, message: impl Into<String>) {
		self.show(ToastKind::Info, message);
	}
}

/// The [`Toaster`] provided by [`ToastHost`].
pub fn use_toaster() -> Toaster {
	expect_context::<Toaster>()
}

/// Provides a [`Toaster`] to `children` and renders its toasts.
#[component]
pub fn ToastHost(children: Children) -> impl IntoView {
	let queue = RwSignal::new(ToastQueue::default());
	provide_context(Toaster { queue });

	view! {
		{children()}
		<div class="toasts">
			<For
				each=move || queue.with(|q| q.items().to_vec())
				key=|toast| toast.id
				children=move |toast| {
					let id = toast.id;
					view! {
						<div class=toast.kind.class() on:click=move |_| queue.update(|q| q.dismiss(id))>
							{toast.message}
						</div>
					}
				}
			/>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn push_and_dismiss() {
		let mut queue = ToastQueue::default();
		let first = queue.push(ToastKind::Success, "Graph saved");
		let second = queue.push(ToastKind::Error, "Error saving graph");
		assert_ne!(first, second);
		assert_eq!(queue.items().len(), 2);

		queue.dismiss(first);
		assert_eq!(queue.items().len(), 1);
		assert_eq!(queue.items()[0].message, "Error saving graph");

		queue.dismiss(first);
		assert_eq!(queue.items().len(), 1);
	}
}
