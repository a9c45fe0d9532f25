//! Tournament service
//!
//! The organizer (the user who created a tournament) is the only party
//! allowed to change it, its roster of teams and its matches.

use crate::clients::{GameCatalog, TeamDirectory};
use crate::error::{AscenderError, Result};
use crate::matches::TournamentMatch;
use crate::metrics::MetricsCollector;
use crate::storage::{EntityStore, InMemoryStore};
use crate::tournament::model::{
    NewTournament, Tournament, TournamentFilter, TournamentJoinRequest, TournamentUpdate,
};
use crate::types::{TeamId, TournamentId, UserId};
use crate::utils::is_blank;
use std::sync::Arc;
use tracing::{debug, info};

/// Storage backing the tournament service
#[derive(Clone)]
pub struct TournamentStores {
    pub tournaments: Arc<dyn EntityStore<Tournament>>,
    pub matches: Arc<dyn EntityStore<TournamentMatch>>,
    pub join_requests: Arc<dyn EntityStore<TournamentJoinRequest>>,
}

impl TournamentStores {
    pub fn in_memory() -> Self {
        Self {
            tournaments: Arc::new(InMemoryStore::new("tournaments")),
            matches: Arc::new(InMemoryStore::new("matches")),
            join_requests: Arc::new(InMemoryStore::new("tournament_join_requests")),
        }
    }
}

#[derive(Clone)]
pub struct TournamentService {
    pub(super) tournaments: Arc<dyn EntityStore<Tournament>>,
    pub(super) matches: Arc<dyn EntityStore<TournamentMatch>>,
    pub(super) join_requests: Arc<dyn EntityStore<TournamentJoinRequest>>,
    pub(super) teams: Arc<dyn TeamDirectory>,
    games: Arc<dyn GameCatalog>,
    pub(super) metrics: Arc<MetricsCollector>,
}

impl TournamentService {
    pub fn new(
        stores: TournamentStores,
        teams: Arc<dyn TeamDirectory>,
        games: Arc<dyn GameCatalog>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            tournaments: stores.tournaments,
            matches: stores.matches,
            join_requests: stores.join_requests,
            teams,
            games,
            metrics,
        }
    }

    pub fn list(&self, filter: &TournamentFilter) -> Result<Vec<Tournament>> {
        self.tournaments.find_by(&|t| filter.matches(t))
    }

    pub fn get(&self, id: TournamentId) -> Result<Tournament> {
        self.tournaments
            .get(&id)?
            .ok_or_else(|| AscenderError::not_found("Tournament", id).into())
    }

    /// Create a tournament; the caller becomes its organizer
    pub async fn create(&self, new: NewTournament, caller: UserId) -> Result<Tournament> {
        if is_blank(&new.name) {
            return Err(AscenderError::bad_request("Tournament name is required").into());
        }

        if !self.games.game_exists(new.game_id).await? {
            return Err(
                AscenderError::bad_request(format!("Unknown game: {}", new.game_id)).into(),
            );
        }

        let tournament = self.tournaments.insert(Tournament::new(new, caller))?;
        self.metrics.record_tournament_created();
        info!(
            "User {} created tournament {} ({})",
            caller, tournament.name, tournament.id
        );
        Ok(tournament)
    }

    pub fn update(
        &self,
        id: TournamentId,
        update: TournamentUpdate,
        caller: UserId,
    ) -> Result<Tournament> {
        self.ensure_organizer(id, caller)?;
        if update.name.as_deref().is_some_and(is_blank) {
            return Err(AscenderError::bad_request("Tournament name must not be blank").into());
        }

        let mut update = Some(update);
        self.modify(id, &mut |tournament| {
            if let Some(update) = update.take() {
                tournament.apply(update);
            }
            Ok(())
        })
    }

    /// Delete a tournament together with its matches and join requests
    pub fn delete(&self, id: TournamentId, caller: UserId) -> Result<()> {
        self.ensure_organizer(id, caller)?;

        self.tournaments.remove(&id)?;
        let matches = self.matches.remove_where(&|m| m.tournament_id == id)?;
        let requests = self.join_requests.remove_where(&|r| r.tournament_id == id)?;

        info!(
            "Deleted tournament {} with {} matches and {} join requests",
            id, matches, requests
        );
        Ok(())
    }

    /// Tournaments a team is registered in
    pub fn by_team(&self, team_id: TeamId) -> Result<Vec<Tournament>> {
        self.tournaments.find_by(&|t| t.has_team(team_id))
    }

    pub async fn add_team(
        &self,
        id: TournamentId,
        team_id: TeamId,
        caller: UserId,
    ) -> Result<Tournament> {
        self.ensure_organizer(id, caller)?;

        if !self.teams.team_exists(team_id).await? {
            return Err(AscenderError::not_found("Team", team_id).into());
        }

        self.register_team(id, team_id)
    }

    pub fn remove_team(
        &self,
        id: TournamentId,
        team_id: TeamId,
        caller: UserId,
    ) -> Result<Tournament> {
        self.ensure_organizer(id, caller)?;

        let tournament = self.modify(id, &mut |tournament| {
            tournament.team_ids.remove(&team_id);
            Ok(())
        })?;
        debug!("Team {} left tournament {}", team_id, id);
        Ok(tournament)
    }

    /// Bracket generation is not provided
    pub fn generate_bracket(&self, id: TournamentId) -> Result<Vec<TournamentMatch>> {
        Err(AscenderError::NotImplemented {
            feature: format!("bracket generation for tournament {}", id),
        }
        .into())
    }

    /// Bracket updates are not provided
    pub fn update_bracket(&self, id: TournamentId) -> Result<()> {
        Err(AscenderError::NotImplemented {
            feature: format!("bracket update for tournament {}", id),
        }
        .into())
    }

    pub fn count(&self) -> Result<usize> {
        self.tournaments.count()
    }

    pub fn match_count(&self) -> Result<usize> {
        self.matches.count()
    }

    /// Add a team to the roster, respecting the registration cap.
    /// Registering a team twice is a no-op.
    pub(super) fn register_team(&self, id: TournamentId, team_id: TeamId) -> Result<Tournament> {
        let tournament = self.modify(id, &mut |tournament| {
            if tournament.has_team(team_id) {
                return Ok(());
            }
            if tournament.is_full() {
                return Err(AscenderError::bad_request(format!(
                    "Tournament {} is full",
                    tournament.id
                ))
                .into());
            }
            tournament.team_ids.insert(team_id);
            Ok(())
        })?;

        info!("Team {} registered in tournament {}", team_id, id);
        Ok(tournament)
    }

    /// Load a tournament and check the caller organizes it
    pub(super) fn ensure_organizer(&self, id: TournamentId, caller: UserId) -> Result<Tournament> {
        let tournament = self.get(id)?;
        if !tournament.is_organizer(caller) {
            return Err(AscenderError::forbidden(
                "Only the tournament organizer can perform this action",
            )
            .into());
        }
        Ok(tournament)
    }

    fn modify(
        &self,
        id: TournamentId,
        change: &mut dyn FnMut(&mut Tournament) -> Result<()>,
    ) -> Result<Tournament> {
        self.tournaments
            .update(&id, change)?
            .ok_or_else(|| AscenderError::not_found("Tournament", id).into())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::clients::{MockGameCatalog, MockTeamDirectory};
    use crate::types::TournamentFormat;
    use crate::utils::generate_id;

    /// Service whose directory knows every team and whose catalog knows every game
    pub fn permissive_service() -> TournamentService {
        let mut teams = MockTeamDirectory::new();
        teams.expect_team_exists().returning(|_| Ok(true));
        teams.expect_is_team_creator().returning(|_, _| Ok(true));

        let mut games = MockGameCatalog::new();
        games.expect_game_exists().returning(|_| Ok(true));

        TournamentService::new(
            TournamentStores::in_memory(),
            Arc::new(teams),
            Arc::new(games),
            Arc::new(MetricsCollector::new().unwrap()),
        )
    }

    pub async fn tournament_with_teams(
        service: &TournamentService,
        organizer: UserId,
        team_count: usize,
    ) -> (Tournament, Vec<TeamId>) {
        let tournament = service
            .create(
                NewTournament::new("Riyadh Masters", generate_id(), TournamentFormat::Bo3),
                organizer,
            )
            .await
            .unwrap();

        let mut teams = Vec::new();
        for _ in 0..team_count {
            let team_id = generate_id();
            service.add_team(tournament.id, team_id, organizer).await.unwrap();
            teams.push(team_id);
        }

        (service.get(tournament.id).unwrap(), teams)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::clients::{MockGameCatalog, MockTeamDirectory};
    use crate::types::{TournamentFormat, TournamentStatus};
    use crate::utils::generate_id;

    fn error_of(err: &anyhow::Error) -> Option<&AscenderError> {
        err.downcast_ref::<AscenderError>()
    }

    #[tokio::test]
    async fn test_create_sets_organizer() {
        let service = permissive_service();
        let organizer = generate_id();
        let (tournament, _) = tournament_with_teams(&service, organizer, 0).await;

        assert_eq!(tournament.organizer_id, organizer);
        assert_eq!(tournament.status, TournamentStatus::Created);
    }

    #[tokio::test]
    async fn test_unknown_game_rejected() {
        let mut games = MockGameCatalog::new();
        games.expect_game_exists().times(1).returning(|_| Ok(false));
        let service = TournamentService::new(
            TournamentStores::in_memory(),
            Arc::new(MockTeamDirectory::new()),
            Arc::new(games),
            Arc::new(MetricsCollector::new().unwrap()),
        );

        let err = service
            .create(
                NewTournament::new("Major", generate_id(), TournamentFormat::Bo1),
                generate_id(),
            )
            .await
            .unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::BadRequest { .. })));
        assert_eq!(service.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let service = permissive_service();
        let err = service
            .create(
                NewTournament::new(" ", generate_id(), TournamentFormat::Bo1),
                generate_id(),
            )
            .await
            .unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_only_organizer_modifies() {
        let service = permissive_service();
        let organizer = generate_id();
        let (tournament, _) = tournament_with_teams(&service, organizer, 0).await;
        let intruder = generate_id();

        let update = TournamentUpdate {
            status: Some(TournamentStatus::RegistrationOpen),
            ..Default::default()
        };
        let err = service
            .update(tournament.id, update.clone(), intruder)
            .unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::Forbidden { .. })));

        let updated = service.update(tournament.id, update, organizer).unwrap();
        assert_eq!(updated.status, TournamentStatus::RegistrationOpen);

        let err = service
            .add_team(tournament.id, generate_id(), intruder)
            .await
            .unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_add_unknown_team() {
        let mut teams = MockTeamDirectory::new();
        teams.expect_team_exists().returning(|_| Ok(false));
        let mut games = MockGameCatalog::new();
        games.expect_game_exists().returning(|_| Ok(true));
        let service = TournamentService::new(
            TournamentStores::in_memory(),
            Arc::new(teams),
            Arc::new(games),
            Arc::new(MetricsCollector::new().unwrap()),
        );
        let organizer = generate_id();
        let (tournament, _) = tournament_with_teams(&service, organizer, 0).await;

        let err = service
            .add_team(tournament.id, generate_id(), organizer)
            .await
            .unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_capacity_enforced() {
        let service = permissive_service();
        let organizer = generate_id();
        let (tournament, teams) = tournament_with_teams(&service, organizer, 2).await;
        service
            .update(
                tournament.id,
                TournamentUpdate {
                    max_teams: Some(2),
                    ..Default::default()
                },
                organizer,
            )
            .unwrap();

        // Re-adding a registered team is fine even when full
        service.add_team(tournament.id, teams[0], organizer).await.unwrap();

        let err = service
            .add_team(tournament.id, generate_id(), organizer)
            .await
            .unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::BadRequest { .. })));
        assert_eq!(service.get(tournament.id).unwrap().team_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_list_filters_and_team_lookup() {
        let service = permissive_service();
        let organizer = generate_id();
        let (tournament, teams) = tournament_with_teams(&service, organizer, 1).await;
        tournament_with_teams(&service, organizer, 0).await;

        assert_eq!(service.list(&TournamentFilter::default()).unwrap().len(), 2);
        let by_game = TournamentFilter {
            game_id: Some(tournament.game_id),
            ..Default::default()
        };
        assert_eq!(service.list(&by_game).unwrap().len(), 1);
        assert_eq!(service.by_team(teams[0]).unwrap()[0].id, tournament.id);

        let tournament = service.remove_team(tournament.id, teams[0], organizer).unwrap();
        assert!(tournament.team_ids.is_empty());
        assert!(service.by_team(teams[0]).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bracket_not_implemented() {
        let service = permissive_service();
        let err = service.generate_bracket(generate_id()).unwrap_err();
        assert!(matches!(
            error_of(&err),
            Some(AscenderError::NotImplemented { .. })
        ));
        assert!(service.update_bracket(generate_id()).is_err());
    }
}
