#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![doc = include_str!("../README.md")]
// @@ begin lint list maintained by maint/add_warning @@
#![allow(renamed_and_removed_lints)]
#![allow(unknown_lints)]
#![warn(missing_docs)]
#![warn(noop_method_call)]
#![warn(unreachable_pub)]
#![warn(clippy::all)]
#![deny(clippy::cargo_common_metadata)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::checked_conversions)]
#![warn(clippy::cognitive_complexity)]
#![deny(clippy::debug_assert_with_mut_call)]
#![deny(clippy::exhaustive_enums)]
#![deny(clippy::exhaustive_structs)]
#![deny(clippy::expl_impl_clone_on_copy)]
#![deny(clippy::fallible_impl_from)]
#![deny(clippy::implicit_clone)]
#![deny(clippy::large_stack_arrays)]
#![warn(clippy::manual_ok_or)]
#![deny(clippy::missing_docs_in_private_items)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::option_option)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![deny(clippy::ref_option_ref)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::trait_duplication_in_bounds)]
#![deny(clippy::unnecessary_wraps)]
#![warn(clippy::unseparated_literal_suffix)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::mod_module_files)]
#![allow(clippy::uninlined_format_args)]
//! <!-- @@ end lint list maintained by maint/add_warning @@ -->

mod anchor;
mod bucket;
mod err;
mod lookup;
mod rand;

pub use crate::anchor::Anchor;
pub use crate::bucket::{BucketId, RemovePolicy};
pub use crate::err::Error;
pub use crate::rand::{fast_range, ProbeRng};

/// Anchor with `u32` bucket ids, for large bucket counts
///
/// Defaults to [`RemovePolicy::Strict`].
pub type WideAnchor = Anchor<u32>;

/// Anchor with `u16` bucket ids, for up to 65,536 buckets
///
/// Half the memory per bucket of a [`WideAnchor`], so more of the state
/// stays in cache during lookups.
/// Defaults to [`RemovePolicy::Lenient`].
pub type CompactAnchor = Anchor<u16>;

/// Builder for creating [`Anchor`] instances with custom settings
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct AnchorBuilder {
    /// Initially working bucket count, or the full capacity if unset
    working: Option<usize>,
    /// Removal policy, or the bucket width's default if unset
    policy: Option<RemovePolicy>,
}

impl AnchorBuilder {
    /// Create a new [`AnchorBuilder`] with default settings.
    ///
    /// Immediately calling [`Self::build()`] makes an anchor with every
    /// bucket working and the width's default [`RemovePolicy`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set how many buckets start out working.
    ///
    /// Buckets `0..working` are working; the rest start out removed.
    pub fn working(&mut self, working: usize) -> &mut Self {
        self.working = Some(working);
        self
    }

    /// Select a [`RemovePolicy`], overriding the width's default.
    pub fn remove_policy(&mut self, policy: RemovePolicy) -> &mut Self {
        self.policy = Some(policy);
        self
    }

    /// Build an [`Anchor`] with `capacity` buckets and the selected options.
    ///
    /// Fails with [`Error::Size`] if the capacity doesn't fit the bucket id
    /// width `T`, or is smaller than the working count.
    pub fn build<T: BucketId>(&self, capacity: usize) -> Result<Anchor<T>, Error> {
        Anchor::with_policy(
            capacity,
            self.working.unwrap_or(capacity),
            self.policy.unwrap_or(T::DEFAULT_POLICY),
        )
    }
}
