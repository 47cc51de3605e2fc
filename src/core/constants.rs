/// Minimum number of players required to start a round
pub const MIN_PLAYERS: usize = 2;

/// Length of a room code
pub const ROOM_CODE_LENGTH: usize = 6;

/// Alphabet room codes are drawn from (uppercase letters and digits)
pub const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How long a round lasts, in seconds
pub const ROUND_DURATION_SECONDS: u32 = 80;

/// Flat score awarded for any correct guess, before the time bonus
pub const BASE_GUESS_SCORE: u32 = 100;

/// Largest inbound WebSocket text frame we accept, in bytes.
/// Drawing strokes and chat lines are tiny; anything bigger is abuse.
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

/// Words a drawer may be asked to draw.
///
/// A few multi-word and hyphenated entries are deliberate: the masked
/// word keeps their spaces and punctuation as underscores too.
pub const WORD_POOL: &[&str] = &[
    "apple",
    "banana",
    "bicycle",
    "airplane",
    "elephant",
    "giraffe",
    "penguin",
    "octopus",
    "butterfly",
    "spider",
    "snowman",
    "rainbow",
    "lighthouse",
    "windmill",
    "volcano",
    "island",
    "mountain",
    "waterfall",
    "castle",
    "bridge",
    "rocket",
    "satellite",
    "telescope",
    "microscope",
    "umbrella",
    "backpack",
    "scissors",
    "toothbrush",
    "ladder",
    "hammer",
    "guitar",
    "trumpet",
    "piano",
    "violin",
    "drum",
    "pizza",
    "hamburger",
    "spaghetti",
    "pancake",
    "cupcake",
    "ice cream",
    "hot dog",
    "french fries",
    "t-shirt",
    "sunglasses",
    "mustache",
    "skeleton",
    "pirate",
    "wizard",
    "mermaid",
    "dragon",
    "unicorn",
    "dinosaur",
    "robot",
    "astronaut",
    "firefighter",
    "scarecrow",
    "tractor",
    "helicopter",
    "submarine",
    "sailboat",
    "anchor",
    "compass",
    "treasure",
    "campfire",
    "tent",
    "fishing rod",
    "kite",
    "balloon",
    "trampoline",
    "swing",
    "slide",
    "seesaw",
    "sandcastle",
    "snail",
    "turtle",
    "kangaroo",
    "flamingo",
    "hedgehog",
    "squirrel",
    "beaver",
    "owl",
    "peacock",
    "jellyfish",
    "starfish",
    "cactus",
    "palm tree",
    "sunflower",
    "mushroom",
    "strawberry",
    "watermelon",
    "pineapple",
    "coconut",
    "pumpkin",
    "corn",
    "carrot",
    "broccoli",
    "donut",
    "popcorn",
    "candle",
];
