use serde::{Deserialize, Serialize};

use crate::{Permission, PermissionSet};

/// Coarse leadership role, each backed by one fixed permission token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadershipRole {
    DistrictPastor,
    ZonalCoordinator,
    UnitHead,
    GroupLeader,
}

impl LeadershipRole {
    pub const ALL: [LeadershipRole; 4] = [
        Self::DistrictPastor,
        Self::ZonalCoordinator,
        Self::UnitHead,
        Self::GroupLeader,
    ];

    pub fn permission(self) -> Permission {
        match self {
            Self::DistrictPastor => Permission::new("leadership:district-pastor"),
            Self::ZonalCoordinator => Permission::new("leadership:zonal-coordinator"),
            Self::UnitHead => Permission::new("leadership:unit-head"),
            Self::GroupLeader => Permission::new("leadership:group-leader"),
        }
    }
}

/// Which leadership roles a guard admits.
///
/// Disabled flags contribute nothing. With every flag off the guard admits no
/// one, since an empty any-of set can never be satisfied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadershipFlags {
    pub district_pastors: bool,
    pub zonal_coordinators: bool,
    pub unit_heads: bool,
    pub group_leaders: bool,
}

impl LeadershipFlags {
    pub fn all() -> Self {
        Self {
            district_pastors: true,
            zonal_coordinators: true,
            unit_heads: true,
            group_leaders: true,
        }
    }

    pub fn allows(&self, role: LeadershipRole) -> bool {
        match role {
            LeadershipRole::DistrictPastor => self.district_pastors,
            LeadershipRole::ZonalCoordinator => self.zonal_coordinators,
            LeadershipRole::UnitHead => self.unit_heads,
            LeadershipRole::GroupLeader => self.group_leaders,
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = LeadershipRole> + '_ {
        LeadershipRole::ALL.into_iter().filter(|r| self.allows(*r))
    }

    /// Union of the permissions of every enabled role.
    pub fn permissions(&self) -> PermissionSet {
        self.selected().map(LeadershipRole::permission).collect()
    }
}
