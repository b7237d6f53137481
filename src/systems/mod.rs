pub mod conveyor_station;
