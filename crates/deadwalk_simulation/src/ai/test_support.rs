//! Тестовый агент без ECS: все компоненты зомби + headless сервисы.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::components::{AiStateType, Senses, StateMachine, Transition, TriggerEventKind};
use super::context::{ZombieContext, ZombieMachine};
use super::registry::ColliderRegistry;
use super::services::{AnimatorHandle, NavAgent, PhysicsBackend};
use super::states::{register_zombie_states, ZombieBehaviorConfig};
use super::waypoints::{PatrolRoute, WaypointNetwork};
use crate::collision_layers::{COLLISION_LAYER_AI_BODY_PART, COLLISION_LAYER_PLAYER, COLLISION_LAYER_VISUAL_AGGRAVATOR};
use crate::components::{ContactShape, ContactTag, SensorContact, Zombie, ZombieProfile};
use crate::headless::{HeadlessAnimator, HeadlessNavAgent, HeadlessPhysics};

pub const DELTA: f32 = 1.0 / 60.0;

pub struct TestAgent {
    pub entity: Entity,
    pub zombie: Zombie,
    pub senses: Senses,
    pub transform: Transform,
    pub route: PatrolRoute,
    pub network: WaypointNetwork,
    pub nav: NavAgent,
    pub animator: AnimatorHandle,
    pub scene: HeadlessPhysics,
    pub physics: PhysicsBackend,
    pub registry: ColliderRegistry,
    pub rng: ChaCha8Rng,
    pub machine: StateMachine<ZombieMachine>,
    pub now: f32,
    /// Собственный body part агента на линии взгляда
    pub head: Entity,
    next_entity: u32,
}

impl TestAgent {
    /// Зомби в начале координат, смотрит в -Z
    pub fn new(initial: AiStateType) -> Self {
        Self::with_profile(ZombieProfile::default(), initial)
    }

    pub fn with_profile(profile: ZombieProfile, initial: AiStateType) -> Self {
        let entity = Entity::from_raw(1);
        let transform = Transform::IDENTITY;
        let mut machine = StateMachine::new(initial);
        register_zombie_states(&mut machine, &ZombieBehaviorConfig::default());

        let mut registry = ColliderRegistry::default();
        registry.register(entity, entity);

        let mut agent = Self {
            entity,
            zombie: Zombie::new(profile),
            senses: Senses::default(),
            transform,
            route: PatrolRoute::new(Some(Entity::from_raw(2)), false),
            network: WaypointNetwork::new(vec![
                Vec3::new(0.0, 0.0, -8.0),
                Vec3::new(8.0, 0.0, -8.0),
                Vec3::new(8.0, 0.0, 0.0),
            ]),
            nav: NavAgent(Box::new(HeadlessNavAgent::new(transform.translation))),
            animator: AnimatorHandle(Box::new(HeadlessAnimator::new(transform))),
            scene: HeadlessPhysics::default(),
            physics: PhysicsBackend(Box::new(HeadlessPhysics::default())),
            registry,
            rng: ChaCha8Rng::seed_from_u64(7),
            machine,
            now: 0.0,
            head: Entity::PLACEHOLDER,
            next_entity: 100,
        };

        // Собственная голова прямо на уровне сенсора
        let head = agent.next_entity();
        agent.registry.register(head, entity);
        agent.add_sphere(head, Vec3::new(0.0, 1.65, 0.0), 0.15, COLLISION_LAYER_AI_BODY_PART, Some(head));
        agent.head = head;
        agent
    }

    pub fn next_entity(&mut self) -> Entity {
        self.next_entity += 1;
        Entity::from_raw(self.next_entity)
    }

    pub fn add_sphere(&mut self, collider: Entity, center: Vec3, radius: f32, layer: u32, body: Option<Entity>) {
        self.scene.add_sphere(collider, center, radius, layer, body);
        self.physics = PhysicsBackend(Box::new(self.scene.clone()));
    }

    /// Игрок (коллайдер в сцене) + контакт сенсора
    pub fn player_at(&mut self, position: Vec3) -> SensorContact {
        let collider = self.next_entity();
        self.add_sphere(collider, position, 0.4, COLLISION_LAYER_PLAYER, None);
        SensorContact::new(collider, ContactTag::Player, &Transform::from_translation(position), ContactShape::Point)
    }

    pub fn food_at(&mut self, position: Vec3) -> SensorContact {
        let collider = self.next_entity();
        self.add_sphere(collider, position, 0.3, COLLISION_LAYER_VISUAL_AGGRAVATOR, None);
        SensorContact::new(collider, ContactTag::Food, &Transform::from_translation(position), ContactShape::Point)
    }

    pub fn sound_at(&mut self, position: Vec3, radius: f32) -> SensorContact {
        let collider = self.next_entity();
        SensorContact::new(
            collider,
            ContactTag::SoundEmitter,
            &Transform::from_translation(position),
            ContactShape::Sphere { center: Vec3::ZERO, radius },
        )
    }

    /// Фонарик: box глубиной `depth` вдоль forward
    pub fn light_at(&mut self, position: Vec3, depth: f32) -> SensorContact {
        let collider = self.next_entity();
        SensorContact::new(
            collider,
            ContactTag::Flashlight,
            &Transform::from_translation(position),
            ContactShape::Box { size: Vec3::new(1.0, 1.0, depth) },
        )
    }

    /// (state machine, context): как их раскладывает система
    pub fn parts(&mut self) -> (&mut StateMachine<ZombieMachine>, ZombieContext<'_>) {
        let mut ctx = ZombieContext::new(
            self.entity,
            &mut self.zombie,
            &mut self.senses,
            &mut self.transform,
            &mut self.route,
            &self.registry,
            &mut self.rng,
            self.now,
            DELTA,
        );
        ctx.waypoints = Some(&self.network);
        ctx.nav = Some(&mut self.nav);
        ctx.animator = Some(&mut self.animator);
        ctx.physics = Some(&self.physics);
        (&mut self.machine, ctx)
    }

    /// Только perception: pre-pass + классификация контактов
    pub fn sense(&mut self, contacts: &[SensorContact]) {
        let position = self.transform.translation;
        self.senses.begin_tick(position);

        let (machine, mut ctx) = self.parts();
        machine.start(&mut ctx);
        for contact in contacts {
            machine.trigger_event(&mut ctx, TriggerEventKind::Stay, contact);
        }
    }

    /// Только OnUpdate (без pre-pass): для флагов, выставленных тестом
    pub fn think(&mut self) -> Option<Transition> {
        let (machine, mut ctx) = self.parts();
        machine.start(&mut ctx);
        machine.tick(&mut ctx)
    }

    /// Полный тик: pre-pass → контакты → OnUpdate
    pub fn step(&mut self, contacts: &[SensorContact]) -> Option<Transition> {
        self.now += DELTA;
        self.sense(contacts);
        self.think()
    }

    pub fn state(&self) -> AiStateType {
        self.machine.current_type()
    }
}
