//! Members, bans, visitors and ratings

use super::record::{LoadContext, RowCheck, StagedRecord};
use super::RecordKind;
use crate::island_cache::{CachedIslandInfo, PlayerRef, PlayerRole, Rating};
use crate::record_store::RecordRow;
use crate::report::Rejection;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub island: Uuid,
    pub player: PlayerRef,
    pub role: PlayerRole,
}

impl StagedRecord for MemberRecord {
    const KIND: RecordKind = RecordKind::Members;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let player = check.require(row.get::<Uuid>("player"), "invalid player uuid")?;

        // Unknown or missing roles fall back to the default role
        let role = row
            .get::<i32>("role")
            .and_then(PlayerRole::from_id)
            .unwrap_or_else(PlayerRole::default_role);

        Ok(Self {
            island: check.island,
            player: ctx.resolvers.resolve_player(player),
            role,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.members.insert(self.player, self.role);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BanRecord {
    pub island: Uuid,
    pub player: PlayerRef,
}

impl StagedRecord for BanRecord {
    const KIND: RecordKind = RecordKind::Bans;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let player = check.require(row.get::<Uuid>("player"), "invalid player uuid")?;

        Ok(Self {
            island: check.island,
            player: ctx.resolvers.resolve_player(player),
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.banned_players.insert(self.player);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitorRecord {
    pub island: Uuid,
    pub player: PlayerRef,
    /// Unix millis
    pub visit_time: i64,
}

impl StagedRecord for VisitorRecord {
    const KIND: RecordKind = RecordKind::Visitors;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let player = check.require(row.get::<Uuid>("player"), "invalid player uuid")?;
        let visit_time = row
            .get::<i64>("visit_time")
            .unwrap_or_else(|| ctx.now_millis());

        Ok(Self {
            island: check.island,
            player: ctx.resolvers.resolve_player(player),
            visit_time,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.unique_visitors.push((self.player, self.visit_time));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub island: Uuid,
    pub player: Uuid,
    pub rating: Rating,
}

impl StagedRecord for RatingRecord {
    const KIND: RecordKind = RecordKind::Ratings;

    fn validate(row: &RecordRow, _ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let player = check.require(row.get::<Uuid>("player"), "invalid player uuid")?;
        let rating = check.require(
            row.get::<i32>("rating").and_then(Rating::from_value),
            "invalid rating value",
        )?;

        Ok(Self {
            island: check.island,
            player,
            rating,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.ratings.insert(self.player, self.rating);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::record::test_support::*;

    #[test]
    fn test_member_role_defaults() {
        let fixture = ContextFixture::new(0);
        let island = Uuid::new_v4();
        let player = Uuid::new_v4();

        let unknown_role = island_row(island)
            .with_text("player", &player.to_string())
            .with("role", 99i64);
        let record = MemberRecord::validate(&unknown_role, &fixture.ctx()).unwrap();
        assert_eq!(record.role, PlayerRole::Member);

        let admin = island_row(island)
            .with_text("player", &player.to_string())
            .with("role", 2i64);
        let record = MemberRecord::validate(&admin, &fixture.ctx()).unwrap();
        assert_eq!(record.role, PlayerRole::Admin);
    }

    #[test]
    fn test_member_without_player_is_rejected() {
        let fixture = ContextFixture::new(0);
        let island = Uuid::new_v4();

        let rejection = MemberRecord::validate(&island_row(island), &fixture.ctx()).unwrap_err();
        assert_eq!(rejection.island, Some(island));
        assert_eq!(rejection.reason, "invalid player uuid");
    }

    #[test]
    fn test_bans_are_a_set() {
        let mut info = CachedIslandInfo::new(Uuid::nil());
        let player = PlayerRef(Uuid::new_v4());
        for _ in 0..2 {
            BanRecord {
                island: Uuid::nil(),
                player,
            }
            .apply(&mut info);
        }
        assert_eq!(info.banned_players.len(), 1);
    }

    #[test]
    fn test_visit_time_defaults_to_now() {
        let fixture = ContextFixture::new(1_700_000_000_123);
        let island = Uuid::new_v4();
        let row = island_row(island).with_text("player", &Uuid::new_v4().to_string());

        let record = VisitorRecord::validate(&row, &fixture.ctx()).unwrap();
        assert_eq!(record.visit_time, 1_700_000_000_123);
    }

    #[test]
    fn test_repeat_visits_are_kept() {
        let mut info = CachedIslandInfo::new(Uuid::nil());
        let player = PlayerRef(Uuid::new_v4());
        for visit_time in [10, 20] {
            VisitorRecord {
                island: Uuid::nil(),
                player,
                visit_time,
            }
            .apply(&mut info);
        }
        assert_eq!(info.unique_visitors, vec![(player, 10), (player, 20)]);
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let fixture = ContextFixture::new(0);
        let row = island_row(Uuid::new_v4())
            .with_text("player", &Uuid::new_v4().to_string())
            .with("rating", 7i64);

        let rejection = RatingRecord::validate(&row, &fixture.ctx()).unwrap_err();
        assert_eq!(rejection.reason, "invalid rating value");
    }
}
