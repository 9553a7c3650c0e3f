//! Achievement listing service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{AchievementRepository, AchievementsQuery};
use crate::domain::{AchievementView, Error, UserId};

/// Service implementing [`AchievementsQuery`].
#[derive(Clone)]
pub struct AchievementsService<A> {
    achievement_repo: Arc<A>,
}

impl<A> AchievementsService<A> {
    pub fn new(achievement_repo: Arc<A>) -> Self {
        Self { achievement_repo }
    }
}

#[async_trait]
impl<A> AchievementsQuery for AchievementsService<A>
where
    A: AchievementRepository,
{
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<AchievementView>, Error> {
        let definitions = self
            .achievement_repo
            .definitions()
            .await?;
        let earned: HashMap<_, _> = self
            .achievement_repo
            .unlocked_for(user_id)
            .await?
            .into_iter()
            .map(|achievement| (achievement.achievement_id, achievement))
            .collect();

        Ok(definitions
            .iter()
            .map(|definition| AchievementView::project(definition, earned.get(&definition.id)))
            .collect())
    }
}
