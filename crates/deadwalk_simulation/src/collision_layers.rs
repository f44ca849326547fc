//! Collision Layers Constants
//!
//! Physics layers: centralised constants для всего AI ядра.
//! Хост (движок) обязан раскладывать коллайдеры по этим слоям, иначе
//! LOS и floor-raycast'ы реанимации будут видеть не то.
//!
//! ## Layers:
//! - Layer 1 (0b1 = 1): Default (стены, пропсы)
//! - Layer 2 (0b10 = 2): Player
//! - Layer 3 (0b100 = 4): AI Body Part (ragdoll rigid bodies зомби)
//! - Layer 4 (0b1000 = 8): Visual Aggravator (фонарик, еда)
//! - Layer 5 (0b10000 = 16): Geometry (пол, лестницы: для floor snap)

// ============================================================================
// Layer Битовые Маски (на каком слое объект находится)
// ============================================================================

/// Layer 1: Default (walls, props)
pub const COLLISION_LAYER_DEFAULT: u32 = 0b1; // 1

/// Layer 2: Player
pub const COLLISION_LAYER_PLAYER: u32 = 0b10; // 2

/// Layer 3: AI Body Part (части тела зомби)
pub const COLLISION_LAYER_AI_BODY_PART: u32 = 0b100; // 4

/// Layer 4: Visual Aggravator (фонарик, еда)
pub const COLLISION_LAYER_VISUAL_AGGRAVATOR: u32 = 0b1000; // 8

/// Layer 5: Geometry (walkable floor)
pub const COLLISION_LAYER_GEOMETRY: u32 = 0b10000; // 16

// ============================================================================
// Mask Битовые Маски (что видит raycast)
// ============================================================================

/// Mask: LOS на игрока (Player + Body Parts + Default)
///
/// Body parts в маске, чтобы другие зомби перекрывали обзор.
/// Свои собственные части тела отсекаются через ColliderRegistry.
pub const COLLISION_MASK_PLAYER_LOS: u32 =
    COLLISION_LAYER_PLAYER | COLLISION_LAYER_AI_BODY_PART | COLLISION_LAYER_DEFAULT;

/// Mask: LOS на визуальные раздражители (еда): то же + Visual Aggravator
pub const COLLISION_MASK_VISUAL_LOS: u32 =
    COLLISION_MASK_PLAYER_LOS | COLLISION_LAYER_VISUAL_AGGRAVATOR;

/// Mask: floor raycast при реанимации
pub const COLLISION_MASK_GEOMETRY: u32 = COLLISION_LAYER_GEOMETRY | COLLISION_LAYER_DEFAULT;

// ============================================================================
// Helper Functions
// ============================================================================

/// Получить название слоя для debug логов
pub fn get_layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        COLLISION_LAYER_DEFAULT => "Default",
        COLLISION_LAYER_PLAYER => "Player",
        COLLISION_LAYER_AI_BODY_PART => "AI Body Part",
        COLLISION_LAYER_VISUAL_AGGRAVATOR => "Visual Aggravator",
        COLLISION_LAYER_GEOMETRY => "Geometry",
        _ => "Unknown",
    }
}

/// Проверка: слой попадает в маску
pub fn layer_in_mask(layer_bits: u32, mask: u32) -> bool {
    layer_bits & mask != 0
}
