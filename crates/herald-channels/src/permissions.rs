//! @everyone permission arithmetic on channel overwrites.

use crate::traits::Visibility;
use serenity::all::{PermissionOverwrite, PermissionOverwriteType, Permissions, RoleId};

/// Find the overwrite that targets `role`.
pub fn role_overwrite(overwrites: &[PermissionOverwrite], role: RoleId) -> Option<&PermissionOverwrite> {
    overwrites
        .iter()
        .find(|overwrite| matches!(overwrite.kind, PermissionOverwriteType::Role(id) if id == role))
}

/// Effective permissions of the @everyone role in a channel.
///
/// Starts from the role's guild permissions, then applies the channel's
/// @everyone overwrite (deny first, then allow). Administrator grants all.
pub fn everyone_permissions(
    base: Permissions,
    overwrites: &[PermissionOverwrite],
    everyone: RoleId,
) -> Permissions {
    if base.contains(Permissions::ADMINISTRATOR) {
        return Permissions::all();
    }

    let mut permissions = base;
    if let Some(overwrite) = role_overwrite(overwrites, everyone) {
        permissions.remove(overwrite.deny);
        permissions.insert(overwrite.allow);
    }
    permissions
}

/// The @everyone "view channel" overwrite state.
pub fn view_visibility(overwrites: &[PermissionOverwrite], everyone: RoleId) -> Visibility {
    match role_overwrite(overwrites, everyone) {
        Some(o) if o.allow.contains(Permissions::VIEW_CHANNEL) => Visibility::Allowed,
        Some(o) if o.deny.contains(Permissions::VIEW_CHANNEL) => Visibility::Denied,
        _ => Visibility::Inherited,
    }
}

/// Build the @everyone overwrite with its view bit set to `visibility`,
/// keeping every other bit of `existing`.
pub fn with_view(
    existing: Option<&PermissionOverwrite>,
    everyone: RoleId,
    visibility: Visibility,
) -> PermissionOverwrite {
    let (mut allow, mut deny) = existing
        .map(|o| (o.allow, o.deny))
        .unwrap_or((Permissions::empty(), Permissions::empty()));

    allow.remove(Permissions::VIEW_CHANNEL);
    deny.remove(Permissions::VIEW_CHANNEL);
    match visibility {
        Visibility::Allowed => allow.insert(Permissions::VIEW_CHANNEL),
        Visibility::Denied => deny.insert(Permissions::VIEW_CHANNEL),
        Visibility::Inherited => {}
    }

    PermissionOverwrite {
        allow,
        deny,
        kind: PermissionOverwriteType::Role(everyone),
    }
}
