//! Waypoint network (внешний asset) + агентский курсор патруля.

use bevy::prelude::*;
use rand::Rng;

/// Component: сеть вейпоинтов (отдельная entity, общая для многих агентов)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct WaypointNetwork {
    pub points: Vec<Vec3>,
}

impl WaypointNetwork {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Component: курсор патруля агента
///
/// `cursor == None`: маршрут ещё не начат: первый запрос выбирает 0
/// (или случайный индекс при `random`).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    pub network: Option<Entity>,
    pub random: bool,
    cursor: Option<usize>,
}

impl PatrolRoute {
    pub fn new(network: Option<Entity>, random: bool) -> Self {
        Self { network, random, cursor: None }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Текущий (или следующий при `increment`) вейпоинт
    pub fn waypoint(&mut self, network: &WaypointNetwork, increment: bool, rng: &mut impl Rng) -> Option<Vec3> {
        let count = network.len();
        if count == 0 {
            return None;
        }

        let index = match self.cursor {
            Some(current) if current < count => {
                if increment {
                    next_index(current, count, self.random, rng)
                } else {
                    current
                }
            }
            _ => {
                if self.random {
                    rng.gen_range(0..count)
                } else {
                    0
                }
            }
        };

        self.cursor = Some(index);
        network.points.get(index).copied()
    }
}

/// Следующий индекс: последовательно по кругу или случайно без повтора
fn next_index(current: usize, count: usize, random: bool, rng: &mut impl Rng) -> usize {
    if random && count > 1 {
        let mut next = current;
        while next == current {
            next = rng.gen_range(0..count);
        }
        next
    } else if current + 1 >= count {
        0
    } else {
        current + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square() -> WaypointNetwork {
        WaypointNetwork::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ])
    }

    #[test]
    fn test_sequential_route_wraps() {
        let network = square();
        let mut route = PatrolRoute::new(None, false);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(route.waypoint(&network, true, &mut rng), Some(network.points[0]));
        assert_eq!(route.waypoint(&network, false, &mut rng), Some(network.points[0]));
        assert_eq!(route.waypoint(&network, true, &mut rng), Some(network.points[1]));
        route.waypoint(&network, true, &mut rng);
        route.waypoint(&network, true, &mut rng);
        assert_eq!(route.waypoint(&network, true, &mut rng), Some(network.points[0]));
    }

    #[test]
    fn test_random_route_never_repeats() {
        let network = square();
        let mut route = PatrolRoute::new(None, true);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        route.waypoint(&network, false, &mut rng);
        for _ in 0..50 {
            let before = route.cursor();
            route.waypoint(&network, true, &mut rng);
            assert_ne!(route.cursor(), before);
        }
    }

    #[test]
    fn test_empty_network_has_no_waypoint() {
        let mut route = PatrolRoute::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(route.waypoint(&WaypointNetwork::default(), false, &mut rng), None);
        assert_eq!(route.cursor(), None);
    }
}
