use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("tile ({x}, {y}) is outside a {width}x{height} room")]
    OutOfRange { x: i32, y: i32, width: usize, height: usize },
    #[error("room index {index} is outside a level of {room_count} rooms")]
    RoomIndexOutOfRange { index: usize, room_count: usize },
}
